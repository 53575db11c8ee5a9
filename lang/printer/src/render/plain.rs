use std::io;

use crate::types::Anno;

/// Renders a document into a string, discarding all annotations.
pub struct PlainWriter<'a> {
    out: &'a mut String,
}

impl<'a> PlainWriter<'a> {
    pub fn new(out: &'a mut String) -> PlainWriter<'a> {
        PlainWriter { out }
    }
}

impl pretty::Render for PlainWriter<'_> {
    type Error = io::Error;

    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.push_str(s);
        Ok(s.len())
    }

    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.push_str(s);
        Ok(())
    }

    fn fail_doc(&self) -> Self::Error {
        io::Error::new(io::ErrorKind::Other, "Document failed to render")
    }
}

impl pretty::RenderAnnotated<'_, Anno> for PlainWriter<'_> {
    fn push_annotation(&mut self, _anno: &Anno) -> Result<(), Self::Error> {
        Ok(())
    }

    fn pop_annotation(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
