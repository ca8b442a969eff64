use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Returns an alphanumeric string, used for document ids
pub fn random_string(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
