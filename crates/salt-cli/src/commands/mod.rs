pub mod config_ops;
pub mod search_ops;
pub mod translit_ops;

use std::fs;
use std::io::{self, Read};

use crate::CliError;

/// Contents of `path`, or standard input for `-`.
pub fn read_input(path: &str) -> Result<String, CliError> {
    let io_err = |source| CliError::Io {
        path: path.to_string(),
        source,
    };
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(io_err)?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(io_err)
    }
}
