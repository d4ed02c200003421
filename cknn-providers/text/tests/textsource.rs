#![expect(clippy::expect_used, reason = "tests require contextual panics")]
//! Edit-distance data source over text lines.
use std::io::{self, BufRead, Cursor, Read};

use cknn_core::{CknnBuilder, DataSource, DataSourceError, NeighborSelection};
use cknn_providers_text::{TextProvider, TextProviderError};
use rstest::{fixture, rstest};

#[fixture]
fn words() -> TextProvider {
    let words = ["cat", "bat", "hat", "kitten", "sitting", "mitten"];
    TextProvider::new("words", words.iter().map(|word| (*word).to_owned()).collect())
        .expect("non-empty input")
}

#[rstest]
#[case::substitutions("kitten", "sitting", 3.0)]
#[case::insertion("gumbo", "gambol", 2.0)]
#[case::empty("", "", 0.0)]
#[case::scalar_values("na\u{ef}ve", "naive", 1.0)]
fn distance_is_symmetric_edit_distance(
    #[case] left: &str,
    #[case] right: &str,
    #[case] expected: f64,
) {
    let pair = TextProvider::new("pair", vec![left.to_owned(), right.to_owned()])
        .expect("non-empty input");
    assert_eq!(pair.distance(0, 1), Ok(expected));
    assert_eq!(pair.distance(1, 0), Ok(expected));
    assert_eq!(pair.distance(1, 1), Ok(0.0));
}

#[rstest]
fn indices_past_the_end_are_rejected(words: TextProvider) {
    assert_eq!(words.name(), "words");
    assert_eq!(
        words.distance(2, words.len()),
        Err(DataSourceError::OutOfBounds { index: 6 })
    );
}

#[rstest]
#[case::unix("alpha\nbeta\n", &["alpha", "beta"])]
#[case::windows("carriage\r\nreturn\r\n", &["carriage", "return"])]
#[case::no_terminator("lonely", &["lonely"])]
#[case::blank_line_kept("a\n\nb", &["a", "", "b"])]
fn reader_yields_one_item_per_line(#[case] raw: &str, #[case] expected: &[&str]) {
    let provider = TextProvider::try_from_reader("demo", Cursor::new(raw)).expect("readable");
    assert_eq!(provider.lines(), expected);
}

#[rstest]
fn empty_input_is_rejected() {
    assert!(matches!(
        TextProvider::try_from_reader("demo", Cursor::new("")),
        Err(TextProviderError::EmptyInput)
    ));
    assert!(matches!(
        TextProvider::new("demo", Vec::new()),
        Err(TextProviderError::EmptyInput)
    ));
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk gone"))
    }
}

impl BufRead for Broken {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Err(io::Error::other("disk gone"))
    }

    fn consume(&mut self, _amt: usize) {}
}

#[rstest]
fn read_failures_surface_as_io_errors() {
    let err = TextProvider::try_from_reader("demo", Broken).expect_err("read must fail");
    assert!(matches!(err, TextProviderError::Io(_)));
}

#[rstest]
fn count_graph_links_words_that_share_letters(words: TextProvider) {
    let cknn = CknnBuilder::new()
        .with_n_neighbors(2)
        .with_neighbors(NeighborSelection::Count(2))
        .build()
        .expect("valid options");

    let graph = cknn.fit_source(&words).expect("graph must build");
    let adjacency = graph.adjacency();

    assert_eq!(adjacency.size(), 6);
    assert!(adjacency.weight(0, 1) > 0.0);
    assert!(adjacency.weight(3, 5) > 0.0);
}
