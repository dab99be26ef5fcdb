//! CARP Purkinje network (`.pkje`) format support.
//!
//! The file lists every cable of the network with its relations, the cable
//! parameters, and the coordinates of its nodes:
//!
//! ```text
//! 3
//! ########################################
//! Cable 0
//! -1 -1
//! 1 2
//! 2
//! 75
//! 100
//! 0.0006
//! 0 0 0
//! 1 0 0
//! ########################################
//! Cable 1
//! ...
//! ```
//!
//! Missing relations are written as `-1`. The stream ends with a single NUL
//! byte after the last separator.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::PurkinjeConfig;
use crate::error::Result;
use crate::network::PurkinjeNetwork;

/// Line between cable blocks.
pub const SEPARATOR: &str = "########################################";

/// Write a network in `.pkje` layout.
pub fn write<W: Write>(
    network: &PurkinjeNetwork,
    config: &PurkinjeConfig,
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "{}", network.num_cables())?;
    writeln!(writer, "{}", SEPARATOR)?;

    for cable in network.cable_ids() {
        let relations = network.relations(cable)?;
        let nodes = network.cable_nodes(cable)?;

        writeln!(writer, "Cable {}", cable)?;
        writeln!(writer, "{}", relations.parents)?;
        writeln!(writer, "{}", relations.sons)?;
        writeln!(writer, "{}", nodes.len())?;
        writeln!(writer, "{}", config.cable_size)?;
        writeln!(writer, "{}", config.gap_resistance)?;
        writeln!(writer, "{}", config.conductivity)?;
        for node in nodes {
            let p = network.position(node)?;
            writeln!(writer, "{} {} {} ", p.x, p.y, p.z)?;
        }
        writeln!(writer, "{}", SEPARATOR)?;
    }

    writer.write_all(b"\0")?;
    Ok(())
}

/// Save a network to a `.pkje` file.
///
/// # Example
///
/// ```no_run
/// use carpmesh::config::PurkinjeConfig;
/// use carpmesh::io::pkje;
/// use carpmesh::network::{reconstruct, ReconstructOptions};
///
/// let store = carpmesh::io::load("fibres.vtk").unwrap();
/// let (network, _) = reconstruct(&store, &ReconstructOptions::default()).unwrap();
/// pkje::save(&network, &PurkinjeConfig::default(), "fibres.pkje").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(
    network: &PurkinjeNetwork,
    config: &PurkinjeConfig,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write(network, config, &mut writer)?;
    writer.flush()?;
    log::info!("wrote {} cables to {}", network.num_cables(), path.display());
    Ok(())
}
