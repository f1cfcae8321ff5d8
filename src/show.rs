use itertools::Itertools;

/// Helper trait which can be used to display vertices, labels and
/// expressions in a human readable way. This is distinct from [`std::fmt::Debug`]
/// since it produces output meant for diagnostics and rendered graphs, not
/// for reconstructing the value.
pub trait Show {
    /// Returns a human readable representation of `self`.
    fn show(&self) -> String;

    /// Shows a collection of the thing, by default `{x, y, z}` with the
    /// elements shown individually.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|sym| sym.show()).join(", "))
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }

    fn show_collection<'a, I: IntoIterator<Item = &'a Self>>(iter: I) -> String
    where
        Self: 'a,
    {
        format!(
            "\"{}\"",
            iter.into_iter().map(|sym| sym.to_string()).join("")
        )
    }
}
