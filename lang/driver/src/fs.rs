use std::path::{Path, PathBuf};

use modulo_lang_ast::{HashMap, ModuleName};

use crate::result::{DriverError, Error};

/// Provider of module source texts, by module name.
pub trait FileSource {
    /// Check if the source can provide the given module
    fn manages(&self, module: &ModuleName) -> bool;
    /// Read the source text of the given module
    fn read_to_string(&self, module: &ModuleName) -> Result<String, Error>;
}

/// A file source that reads `<name>.mlo` files from a root directory.
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    fn path_of(&self, module: &ModuleName) -> PathBuf {
        self.root.join(format!("{module}.mlo"))
    }
}

impl FileSource for FileSystemSource {
    fn manages(&self, module: &ModuleName) -> bool {
        self.path_of(module).exists()
    }

    fn read_to_string(&self, module: &ModuleName) -> Result<String, Error> {
        let source = std::fs::read_to_string(self.path_of(module))
            .map_err(DriverError::Io)
            .map_err(Error::Driver)?;
        Ok(source)
    }
}

/// A file source that keeps all module texts in memory. Used by the
/// test suites.
#[derive(Default)]
pub struct InMemorySource {
    files: HashMap<ModuleName, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, module: &str, source: &str) -> Self {
        self.files.insert(ModuleName::from_string(module), source.to_owned());
        self
    }
}

impl FileSource for InMemorySource {
    fn manages(&self, module: &ModuleName) -> bool {
        self.files.contains_key(module)
    }

    fn read_to_string(&self, module: &ModuleName) -> Result<String, Error> {
        self.files.get(module).cloned().ok_or_else(|| {
            Error::Driver(DriverError::ModuleNotFound { module: module.to_string() })
        })
    }
}
