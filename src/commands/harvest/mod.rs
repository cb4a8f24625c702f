use scraper::ElementRef;

pub(crate) mod councils;
pub(crate) mod extract;
pub(crate) mod normalize;
pub(crate) mod regions;
mod run;
#[cfg(test)]
mod tests;

pub use run::run;

/// Text content of an element with whitespace collapsed to single spaces.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
