use crate::fixtures::Fixture;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "geotiff-fixtures")]
#[command(about = "Generate deterministic GeoTIFF test fixtures")]
#[command(version)]
#[command(author = "Huimori Project")]
pub struct Args {
    /// Fixtures to build (default: all of them)
    #[arg(value_enum, value_name = "FIXTURE")]
    pub fixtures: Vec<Fixture>,

    /// Directory the fixture files are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out_dir: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn selected(&self) -> Vec<Fixture> {
        if self.fixtures.is_empty() {
            Fixture::ALL.to_vec()
        } else {
            self.fixtures.clone()
        }
    }
}
