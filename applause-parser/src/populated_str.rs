/// The unconsumed tail of a short option cluster, like the `bc` in `-abc`.
/// Statically guaranteed to contain at least one character.
#[derive(Debug, Clone, Copy)]
pub struct PopulatedStr<'a> {
    full: &'a str,
    first: char,
}

impl<'a> PopulatedStr<'a> {
    #[inline]
    pub fn new(full: &'a str) -> Option<Self> {
        full.chars().next().map(|first| Self { full, first })
    }

    /// The whole point: a static guarantee that there's a first character
    #[inline]
    pub fn split_first(self) -> (char, &'a str) {
        (self.first, &self.full[self.first.len_utf8()..])
    }

    #[inline(always)]
    pub fn get(self) -> &'a str {
        self.full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_multibyte_first_char() {
        let populated = PopulatedStr::new("éx").unwrap();
        assert_eq!(populated.split_first(), ('é', "x"));
        assert_eq!(populated.get(), "éx");
    }

    #[test]
    fn empty_is_none() {
        assert!(PopulatedStr::new("").is_none());
    }
}
