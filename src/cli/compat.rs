use std::collections::BTreeSet;

use bloodlink::BloodType;
use clap::Parser;
use tracing::instrument;

use super::{OutputFormat, parse_blood_type, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Look up blood-type donation compatibility")]
pub struct Compat {
    /// The blood type to look up (e.g. O-, AB+)
    #[clap(value_parser = parse_blood_type)]
    blood_type: BloodType,

    /// Treat the blood type as a recipient and list compatible donors
    #[arg(long)]
    donors: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Compat {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let (types, heading): (BTreeSet<BloodType>, _) = if self.donors {
            (
                self.blood_type.donors(),
                format!("{} can receive from", self.blood_type),
            )
        } else {
            (
                self.blood_type.recipients().iter().copied().collect(),
                format!("{} can donate to", self.blood_type),
            )
        };

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&types)?);
            }
            OutputFormat::Table => {
                println!("{heading}:");
                for blood_type in &types {
                    println!("  • {blood_type}");
                }
                if types.len() == BloodType::ALL.len() {
                    let note = if self.donors {
                        "(universal recipient)"
                    } else {
                        "(universal donor)"
                    };
                    println!("{}", note.dim());
                }
            }
        }

        Ok(())
    }
}
