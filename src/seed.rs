//! Synthetic book records for seeding the `books` table.
//!
//! Used by the `seed-books` binary. Output columns follow the table:
//! `book_id,title,author,genre,year,available`.

use std::borrow::Cow;
use std::io::{self, Write};

use rand::{seq::SliceRandom, Rng};

pub const GENRES: [&str; 10] = [
    "Fiction",
    "Non-Fiction",
    "Mystery",
    "Science Fiction",
    "Fantasy",
    "Biography",
    "History",
    "Romance",
    "Horror",
    "Self-Help",
];

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2024;

const WORDS: &[&str] = &[
    "ancient", "autumn", "bright", "broken", "candle", "city", "cloud", "crimson", "dance",
    "dark", "dawn", "desert", "distant", "dream", "echo", "ember", "empire", "evening",
    "fallen", "field", "fire", "forest", "garden", "glass", "golden", "harbor", "heart",
    "hidden", "hollow", "island", "journey", "kingdom", "lantern", "last", "light", "lost",
    "memory", "midnight", "mirror", "moon", "mountain", "night", "ocean", "paper", "path",
    "quiet", "rain", "river", "road", "secret", "shadow", "silent", "silver", "sky", "song",
    "stone", "storm", "summer", "sun", "tide", "tower", "valley", "voice", "wild", "wind",
    "winter", "wolf", "world",
];

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Aisha", "Alice", "Ananya", "Arjun", "Benjamin", "Carlos", "Chloe", "Daniel",
    "Deepa", "Elena", "Ethan", "Fatima", "George", "Hannah", "Isabel", "James", "Kavya",
    "Laura", "Liam", "Maya", "Meera", "Michael", "Nadia", "Noah", "Olivia", "Priya", "Rahul",
    "Rosa", "Samuel", "Sara", "Thomas", "Vikram", "William", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Bhatt", "Brown", "Chen", "Clark", "Das", "Davis", "Fernandez", "Garcia",
    "Gupta", "Harris", "Iyer", "Jackson", "Johnson", "Kapoor", "Khan", "Lee", "Martin",
    "Mehta", "Miller", "Moore", "Nair", "Patel", "Reddy", "Roberts", "Sharma", "Singh",
    "Smith", "Taylor", "Thomas", "Verma", "Walker", "White", "Williams", "Wilson",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub genre: &'static str,
    pub year: i32,
    pub available: bool,
}

/// Endless stream of records with consecutive ids starting at 1
pub struct BookGenerator<R: Rng> {
    rng: R,
    next_id: i32,
}

impl<R: Rng> BookGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, next_id: 1 }
    }

    /// Three words, sentence case
    fn title(&mut self) -> String {
        let words: Vec<&str> = (0..3).map(|_| pick(&mut self.rng, WORDS)).collect();
        let mut title = words.join(" ");
        if let Some(first) = title.get(0..1) {
            let upper = first.to_uppercase();
            title.replace_range(0..1, &upper);
        }
        title
    }

    fn author(&mut self) -> String {
        format!(
            "{} {}",
            pick(&mut self.rng, FIRST_NAMES),
            pick(&mut self.rng, LAST_NAMES)
        )
    }
}

impl<R: Rng> Iterator for BookGenerator<R> {
    type Item = BookRecord;

    fn next(&mut self) -> Option<BookRecord> {
        let book_id = self.next_id;
        self.next_id += 1;

        let title = self.title();
        let author = self.author();
        let genre = pick(&mut self.rng, &GENRES);
        let year = self.rng.gen_range(MIN_YEAR..=MAX_YEAR);

        Some(BookRecord {
            book_id,
            title,
            author,
            genre,
            year,
            available: true,
        })
    }
}

fn pick<R: Rng>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

pub const CSV_HEADER: &str = "book_id,title,author,genre,year,available";

impl BookRecord {
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.book_id,
            csv_field(&self.title),
            csv_field(&self.author),
            csv_field(self.genre),
            self.year,
            if self.available { "True" } else { "False" }
        )
    }
}

/// Quote a field when it contains a delimiter, quote or line break
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Write the header and every record; returns the number of records written
pub fn write_csv<W, I>(mut out: W, records: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = BookRecord>,
{
    writeln!(out, "{}", CSV_HEADER)?;
    let mut count = 0;
    for record in records {
        writeln!(out, "{}", record.to_csv_line())?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}
