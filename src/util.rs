pub fn create_bincode_config() -> bincode::config::Configuration<bincode::config::BigEndian> {
    bincode::config::standard()
        .with_big_endian()
        .with_variable_int_encoding()
}

#[cfg(test)]
pub mod test {
    use rand::prelude::*;

    /// Short sequences over a three-letter alphabet, so matches are common.
    pub fn create_test_bytes(seed: u64) -> impl Iterator<Item = Vec<u8>> {
        let mut rng = StdRng::seed_from_u64(seed);

        std::iter::repeat_with(move || {
            let len = rng.random_range(0..10);
            let mut bytes = Vec::with_capacity(len);
            for _ in 0..len {
                bytes.push(rng.random_range(0..3) as u8);
            }
            bytes
        })
    }

    /// Insert/delete edit distance from a full dynamic-programming table.
    pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
        let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for i in 0..=a.len() {
            for j in 0..=b.len() {
                table[i][j] = if i == 0 || j == 0 {
                    i + j
                } else if a[i - 1] == b[j - 1] {
                    table[i - 1][j - 1]
                } else {
                    1 + table[i - 1][j].min(table[i][j - 1])
                };
            }
        }
        table[a.len()][b.len()]
    }
}
