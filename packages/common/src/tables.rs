use crate::error::EngineError;

/// Splits rank-ordered qualifiers into `number_of_tables` equal groups.
///
/// Seats are dealt round-robin by rank: rank 1 goes to table 1, rank 2 to
/// table 2, and so on, wrapping after the last table. Every table therefore
/// gets a comparable spread of strong and weak entries instead of a block of
/// neighbouring ranks.
pub fn allocate<T: Clone>(ranked: &[T], number_of_tables: usize) -> Result<Vec<Vec<T>>, EngineError> {
    if number_of_tables == 0 {
        return Err(EngineError::Configuration(
            "cannot allocate qualifiers to zero tables".into(),
        ));
    }
    if ranked.len() % number_of_tables != 0 {
        return Err(EngineError::Configuration(format!(
            "{} qualifiers cannot be split evenly across {} tables",
            ranked.len(),
            number_of_tables
        )));
    }

    let per_table = ranked.len() / number_of_tables;
    let mut tables: Vec<Vec<T>> = (0..number_of_tables)
        .map(|_| Vec::with_capacity(per_table))
        .collect();
    for (i, item) in ranked.iter().enumerate() {
        tables[i % number_of_tables].push(item.clone());
    }
    Ok(tables)
}
