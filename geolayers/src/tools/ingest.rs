use anyhow::Result;
use clap::Args;
use geolayers::{CoordinateProfile, IngestPipeline, LayerRegistry, NoopRenderer};
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// geometry file you want to ingest
	/// supported formats are: *.zip (shapefile bundle), *.dxf, *.geojson, *.json
	#[arg(required = true, verbatim_doc_comment)]
	filename: PathBuf,

	/// coordinate profile of the input: "wgs84", "tm3-501" or "tm3-502"
	#[arg(long, short, default_value_t = CoordinateProfile::Wgs84)]
	profile: CoordinateProfile,

	/// write the reprojected layer as GeoJSON to this file instead of stdout
	#[arg(long, short)]
	output: Option<PathBuf>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let pipeline = IngestPipeline::new();
	let mut registry = LayerRegistry::new(Box::<NoopRenderer>::default());

	let id = pipeline
		.ingest_path(&arguments.filename, arguments.profile, &mut registry)
		.await?;

	let layer = registry
		.get(id)
		.ok_or_else(|| anyhow::anyhow!("{id} vanished from the registry"))?;
	eprintln!("ingested \"{}\" as {id} with {} features", layer.name, layer.feature_count);

	let json = layer.collection.to_json_string();
	match &arguments.output {
		Some(path) => tokio::fs::write(path, json).await?,
		None => println!("{json}"),
	}

	Ok(())
}
