use super::types::*;

pub trait ParensExt<'a> {
    fn parens_from(self) -> Builder<'a>;
    fn parens_if(self, condition: bool) -> Builder<'a>;
}

impl<'a> ParensExt<'a> for Builder<'a> {
    fn parens_from(self) -> Builder<'a> {
        self.enclose("(", ")")
    }

    fn parens_if(self, condition: bool) -> Builder<'a> {
        if condition { self.parens_from() } else { self }
    }
}
