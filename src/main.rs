// Garta - GPX viewer and editor
// Copyright (C) 2016-2017, Timo Saarinen
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

#[macro_use] extern crate log;

use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};

use garta_gpsl::core::settings::settings_write;
use garta_gpsl::gpsl::{GpslConverter, GpxConverter, OffsetMode};

#[derive(Parser)]
#[command(name = "gpsl", version, about = "GPSLink track file converter")]
struct Cli {
    /// Settings file in JSON
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a GPSLink file and print it as JSON
    Inspect {
        file: PathBuf,
    },

    /// Parse a GPSLink file and save it again
    Convert {
        input: PathBuf,
        output: PathBuf,

        /// Use the first track point time instead of the last for the GMT offset
        #[arg(long)]
        first_timestamp: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(ref filename) = cli.settings {
        debug!("Loading settings");
        if let Err(e) = settings_write().load(filename) {
            error!("Failed to load settings: {}", e);
            exit(1);
        }
    }

    let mut converter = GpslConverter::new();
    match cli.command {
        Command::Inspect { file } => {
            let parsed = match converter.parse(&file) {
                Ok(parsed) => parsed,
                Err(e) => { eprintln!("{}: {}", file.display(), e); exit(1); }
            };
            match serde_json::to_string_pretty(&parsed.data) {
                Ok(json) => { println!("{}", json); }
                Err(e) => { error!("Failed to print {}: {}", file.display(), e); exit(1); }
            }
            for w in parsed.warnings.iter() {
                eprintln!("{}: {}", file.display(), w);
            }
        }
        Command::Convert { input, output, first_timestamp } => {
            if !converter.is_save_supported(&output) {
                warn!("{} doesn't have a GPSLink file extension", output.display());
            }
            if first_timestamp {
                converter.options.offset_mode = OffsetMode::First;
            }
            let parsed = match converter.parse(&input) {
                Ok(parsed) => parsed,
                Err(e) => { eprintln!("{}: {}", input.display(), e); exit(1); }
            };
            if let Err(e) = converter.save(&parsed.data, &output) {
                eprintln!("{}: {}", output.display(), e);
                exit(1);
            }
            info!("Converted {} to {}", input.display(), output.display());
        }
    }
}
