use clap::Parser;
use log::{error, info};

use isi2coco::{
    assemble, catalog::TableCatalog, config::Args, discover, CatalogSource, ContourMaskEncoder,
    ConvertError, DirTripleDiscoverer, FileDiscoverer,
};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("Conversion failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ConvertError> {
    info!("Starting ISI to COCO conversion process...");

    let mapping = TableCatalog::new(&args.label_table, args.label_delimiter).load()?;
    info!("Loaded {} classes from {}", mapping.len(), args.label_table.display());

    // Refuse to clobber an earlier run before touching any dataset file.
    assemble::ensure_fresh_output(&args.output)?;

    let discoverer = DirTripleDiscoverer::new(
        &args.image_dir,
        &args.semantic_dir,
        &args.instance_dir,
    );
    let (images, semantic, instance) = discoverer.discover()?;
    let samples = discover::pair(images, semantic, instance)?;
    info!("Discovered {} sample triples", samples.len());

    let encoder = ContourMaskEncoder::new(args.tolerance, args.segmentation);
    let document = assemble::build(&mapping, &samples, &encoder)?;

    assemble::write_output(&document, &args.output)?;
    info!("Conversion process completed successfully.");
    Ok(())
}
