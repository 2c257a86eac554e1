//! Chapter-number reconciliation
//!
//! Raw chapter titles from binary APIs look like `#12`, `#ex`, `#3-1` or `One-Shot`.
//! [`ChapterNumberer`] turns a left-to-right sequence of such titles into display
//! numbers. Extras and unrecognized titles become sub-numbers of the last main chapter.
//! The reconciler never fails; every title gets a number.

/// Stateful chapter-number reconciler
///
/// Starts with last main number `"0"` and next sub-number `1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterNumberer {
    last_number: String,
    last_sub: i64,
}

impl Default for ChapterNumberer {
    fn default() -> Self {
        Self {
            last_number: "0".to_string(),
            last_sub: 1,
        }
    }
}

impl ChapterNumberer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the display number for the next chapter in the sequence
    ///
    /// # Arguments
    ///
    /// * `title` - Raw chapter title, e.g. `#12`
    /// * `subtitle` - Chapter subtitle, only consulted for the oneshot check
    pub fn next(&mut self, title: &str, subtitle: &str) -> String {
        if is_oneshot(title, subtitle) {
            return "1".to_string();
        }

        if is_extra(title) {
            return self.next_sub();
        }

        if let Some(number) = parse_chapter_int(title) {
            self.last_number = number.to_string();
            self.last_sub = 1;
            return self.last_number.clone();
        }

        if let Some((main, sub)) = parse_split(title) {
            // A sub-number at the integer limit has no successor and falls through
            if let Some(following) = sub.checked_add(1) {
                self.last_number = main.to_string();
                self.last_sub = following;
                return format!("{}.{}", main, sub);
            }
        }

        self.next_sub()
    }

    fn next_sub(&mut self) -> String {
        let number = format!("{}.{}", self.last_number, self.last_sub);
        self.last_sub = self.last_sub.saturating_add(1);
        number
    }
}

/// Reconciles a whole sequence of `(title, subtitle)` pairs
pub fn reconcile<'a, I>(titles: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut numberer = ChapterNumberer::new();
    titles
        .into_iter()
        .map(|(title, subtitle)| numberer.next(title, subtitle))
        .collect()
}

/// True when the title or subtitle names a oneshot (contains "one" and "shot")
pub fn is_oneshot(title: &str, subtitle: &str) -> bool {
    [title, subtitle].iter().any(|field| {
        let field = field.to_lowercase();
        field.contains("one") && field.contains("shot")
    })
}

/// True when the title is an extra chapter marker (`#ex`)
pub fn is_extra(title: &str) -> bool {
    title.trim_matches('#') == "ex"
}

/// Parses a title like `#12` into its integer
pub fn parse_chapter_int(title: &str) -> Option<i64> {
    title.trim_start_matches('#').parse().ok()
}

fn parse_split(title: &str) -> Option<(i64, i64)> {
    let mut parts = title.split('-');
    let main = parts.next()?;
    let sub = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((parse_chapter_int(main)?, parse_chapter_int(sub)?))
}
