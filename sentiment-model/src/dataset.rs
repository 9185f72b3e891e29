//! Mock training corpus used by the `train` binary and the tests.

/// Label for positive sentiment
pub const POSITIVE: i64 = 1;

/// Label for negative sentiment
pub const NEGATIVE: i64 = 0;

const MOCK_CORPUS: [(&str, i64); 15] = [
    ("I love this product", POSITIVE),
    ("Amazing quality and fast delivery", POSITIVE),
    ("Great service and friendly staff", POSITIVE),
    ("Outstanding experience", POSITIVE),
    ("Highly recommend this", POSITIVE),
    ("Terrible service", NEGATIVE),
    ("Worst product ever", NEGATIVE),
    ("Poor quality and slow shipping", NEGATIVE),
    ("Very disappointed", NEGATIVE),
    ("Awful experience", NEGATIVE),
    ("Not worth the money", NEGATIVE),
    ("Excellent customer support", POSITIVE),
    ("Perfect condition", POSITIVE),
    ("Fast shipping and good price", POSITIVE),
    ("Will buy again", POSITIVE),
];

/// Texts and labels of the mock corpus, in matching order.
pub fn mock_dataset() -> (Vec<&'static str>, Vec<i64>) {
    MOCK_CORPUS.iter().copied().unzip()
}
