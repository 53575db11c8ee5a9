use pretty::termcolor::WriteColor;

use crate::render;

pub const DEFAULT_WIDTH: usize = 100;

/// Semantic annotations produced by the printer.
/// The renderers decide how an annotation is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anno {
    Keyword,
    Sym,
    Typ,
    Hole,
    Comment,
}

pub type Alloc<'a> = pretty::Arena<'a, Anno>;
pub type Builder<'a> = pretty::DocBuilder<'a, Alloc<'a>, Anno>;

/// Operator precedence used to decide where parentheses are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Lambdas, dependent products and arrows
    Exp,
    /// Applications
    App,
    /// Variables, symbols, sorts, holes, parenthesized expressions
    Atom,
}

#[derive(Debug, Clone)]
pub struct PrintCfg {
    pub width: usize,
    pub indent: isize,
    /// Print de Bruijn indices alongside variable names
    pub de_bruijn: bool,
    /// Print symbols with their full module path
    pub qualified: bool,
}

impl Default for PrintCfg {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, indent: 4, de_bruijn: false, qualified: false }
    }
}

pub trait Print {
    /// Implementations must override either `print` or `print_prec`,
    /// otherwise the two default implementations recurse forever.
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        self.print_prec(cfg, alloc, Precedence::Exp)
    }

    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        self.print(cfg, alloc)
    }

    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String {
        let alloc = Alloc::new();
        let cfg = match cfg {
            Some(cfg) => cfg.clone(),
            None => PrintCfg::default(),
        };
        let mut buf = String::new();
        let doc_builder = self.print(&cfg, &alloc);
        doc_builder
            .1
            .render_raw(cfg.width, &mut render::PlainWriter::new(&mut buf))
            .expect("Failed to print to string");
        buf
    }

    fn print_colored<W: WriteColor>(&self, cfg: &PrintCfg, out: W) -> std::io::Result<()> {
        let alloc = Alloc::new();
        let doc_builder = self.print(cfg, &alloc);
        doc_builder.1.render_raw(cfg.width, &mut render::ColorWriter::new(out))
    }
}

impl<T: Print> Print for Box<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        (**self).print(cfg, alloc)
    }

    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        (**self).print_prec(cfg, alloc, prec)
    }
}

impl<T: Print> Print for &T {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        (**self).print(cfg, alloc)
    }

    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        (**self).print_prec(cfg, alloc, prec)
    }
}
