use modulo_lang_miette_util::codespan::Span;

pub trait HasSpan {
    fn span(&self) -> Option<Span>;
}

impl<T: HasSpan> HasSpan for Box<T> {
    fn span(&self) -> Option<Span> {
        (**self).span()
    }
}

impl<T: HasSpan> HasSpan for Option<T> {
    fn span(&self) -> Option<Span> {
        self.as_ref().and_then(|x| x.span())
    }
}
