pub trait StrExt {
    /// Truncates or right-pads with spaces to exactly `width` characters.
    fn fit(&self, width: usize) -> String;
    /// Centers within `width` characters, truncating if it does not fit.
    fn center(&self, width: usize) -> String;
}

impl StrExt for str {
    fn fit(&self, width: usize) -> String {
        let mut out: String = self.chars().take(width).collect();
        while out.chars().count() < width {
            out.push(' ');
        }
        out
    }

    fn center(&self, width: usize) -> String {
        let s: String = self.chars().take(width).collect();
        let left = (width - s.chars().count()) / 2;
        let mut out = String::with_capacity(width);
        for _ in 0..left {
            out.push(' ');
        }
        out.push_str(&s);
        out.fit(width)
    }
}
