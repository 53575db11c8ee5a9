//! Compiled module objects
//!
//! A checked module can be persisted so that later runs `require` it
//! without re-checking its source. Terms are stored in their de Bruijn
//! form; symbol references are stored by qualified name and relinked
//! against the signature on load. The rule list records every rule the
//! module declared, including rules on symbols owned by other modules,
//! so that replaying it re-attaches cross-module rules.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use modulo_lang_ast::{ModuleName, Rule, Symbol};

use crate::result::{DriverError, Error};

/// Extension of object files: `<name>.mlo.o`.
pub const OBJECT_EXT: &str = "mlo.o";

/// Bumped whenever the serialised representation changes.
pub(crate) const OBJECT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct ObjectFile {
    pub version: u32,
    pub module: ModuleName,
    pub deps: Vec<ModuleName>,
    pub symbols: Vec<Symbol>,
    pub rules: Vec<Rule>,
}

pub fn write(path: &Path, object: &ObjectFile) -> Result<(), Error> {
    let file = File::create(path).map_err(DriverError::Io)?;
    bincode::serialize_into(BufWriter::new(file), object).map_err(|err| {
        DriverError::ObjectCorrupt { module: object.module.to_string(), reason: err.to_string() }
    })?;
    Ok(())
}

pub fn read(path: &Path, module: &ModuleName) -> Result<ObjectFile, Error> {
    let file = File::open(path).map_err(DriverError::Io)?;
    let object: ObjectFile =
        bincode::deserialize_from(BufReader::new(file)).map_err(|err| DriverError::ObjectCorrupt {
            module: module.to_string(),
            reason: err.to_string(),
        })?;
    if object.version != OBJECT_VERSION || object.module != *module {
        return Err(DriverError::StaleObject { module: module.to_string() }.into());
    }
    Ok(object)
}
