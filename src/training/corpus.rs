//! Training corpus preparation: shuffling, dev split and noise generation.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Error;

/// Read a corpus, one sentence per line.
pub fn read_lines(path: &Path) -> Result<Vec<String>, Error> {
    let reader = BufReader::new(File::open(path)?);
    Ok(reader.lines().collect::<Result<_, _>>()?)
}

/// Write sentences, one per line.
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<(), Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    writer.flush()?;
    Ok(())
}

/// Shuffle `lines` and split them into `(train, dev)`, dev holding the first `dev_size` lines.
///
/// If the corpus holds fewer than `dev_size` lines, everything ends up in dev.
pub fn shuffle_split<R: Rng>(
    mut lines: Vec<String>,
    dev_size: usize,
    rng: &mut R,
) -> (Vec<String>, Vec<String>) {
    lines.shuffle(rng);
    let split = dev_size.min(lines.len());
    let train = lines.split_off(split);
    (train, lines)
}

/// Noisy version of a set of sentences: the characters of each (trimmed) sentence are shuffled.
pub fn shuffle_chars<R: Rng>(sentences: &[String], rng: &mut R) -> Vec<String> {
    sentences
        .iter()
        .map(|s| {
            let mut chars: Vec<char> = s.trim().chars().collect();
            chars.shuffle(rng);
            chars.into_iter().collect()
        })
        .collect()
}
