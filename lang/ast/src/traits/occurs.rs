/// Occurrence check for a single free variable.
pub trait Occurs {
    /// Whether the free variable with de Bruijn index `idx` occurs in
    /// `self`. Implementations bump `idx` by one when they go under a
    /// binder.
    fn occurs(&self, idx: usize) -> bool;
}

impl<T: Occurs> Occurs for Box<T> {
    fn occurs(&self, idx: usize) -> bool {
        (**self).occurs(idx)
    }
}

impl<T: Occurs> Occurs for Option<T> {
    fn occurs(&self, idx: usize) -> bool {
        self.as_ref().is_some_and(|x| x.occurs(idx))
    }
}

impl<T: Occurs> Occurs for Vec<T> {
    fn occurs(&self, idx: usize) -> bool {
        self.iter().any(|x| x.occurs(idx))
    }
}
