use std::str::FromStr;

pub const MAX_CHIRP_LEN: usize = 140;

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

/// Mask every whole word on the denylist, ignoring case.
///
/// Words are split on single spaces only, so `"Fornax!"` survives while `"FORNAX"`
/// does not.
pub fn censor(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            if PROFANE_WORDS.contains(&lower.as_str()) { MASK } else { word }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order {:?}", other)),
        }
    }
}

/// One step of a post listing query. Steps run in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Raw author id as the caller received it; parsed when the filter runs.
    AuthorId(String),
    Sort(SortOrder),
}
