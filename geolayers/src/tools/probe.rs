use anyhow::Result;
use clap::Args;
use geolayers::{CoordinateProfile, IngestPipeline, RawUpload};
use std::{collections::BTreeMap, path::PathBuf};

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// geometry file you want to probe
	/// supported formats are: *.zip (shapefile bundle), *.dxf, *.geojson, *.json
	#[arg(required = true, verbatim_doc_comment)]
	filename: PathBuf,

	/// coordinate profile of the input: "wgs84", "tm3-501" or "tm3-502"
	#[arg(long, short, default_value_t = CoordinateProfile::Wgs84)]
	profile: CoordinateProfile,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	eprintln!("probe {:?}", arguments.filename);

	let upload = RawUpload::from_path(&arguments.filename).await?;
	let collection = IngestPipeline::new().inspect(&upload, arguments.profile)?;

	println!("features: {}", collection.len());

	let mut type_counts = BTreeMap::<&str, usize>::new();
	for feature in &collection.features {
		*type_counts.entry(feature.geometry.type_as_str()).or_default() += 1;
	}
	for (geometry_type, count) in type_counts {
		println!("  {geometry_type}: {count}");
	}

	let degenerate = collection
		.features
		.iter()
		.filter(|feature| feature.geometry.verify().is_err())
		.count();
	if degenerate > 0 {
		println!("degenerate geometries: {degenerate}");
	}

	let bbox = collection.bbox();
	if bbox.is_valid() {
		println!(
			"bbox: [{}, {}, {}, {}]",
			bbox.x_min(),
			bbox.y_min(),
			bbox.x_max(),
			bbox.y_max()
		);
	}

	if let Some(feature) = collection.features.first() {
		let keys = feature.properties.keys().cloned().collect::<Vec<_>>();
		println!("attributes: {}", keys.join(", "));
	}

	Ok(())
}
