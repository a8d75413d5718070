use crate::config::ConfigError;
use crate::symbols::{Symbol, SYMBOL_COUNT};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaytableEntry {
    pub combo: [u8; 3], // symbol indices, sorted ascending
    pub single: u32,
    pub double: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paytable(pub Vec<PaytableEntry>);

static CLASSIC: Lazy<Paytable> = Lazy::new(Paytable::classic);

fn entry(combo: [u8; 3], single: u32, double: u32) -> PaytableEntry {
    PaytableEntry {
        combo,
        single,
        double,
    }
}

impl Paytable {
    pub fn classic() -> Self {
        Self(vec![
            // cherries
            entry([1, 1, 1], 1000, 2000),
            // sevens
            entry([0, 0, 0], 150, 4000),
            // cherries and sevens
            entry([0, 1, 1], 75, 75),
            entry([0, 0, 1], 75, 75),
            entry([4, 4, 4], 50, 150),
            entry([3, 3, 3], 20, 50),
            entry([2, 2, 2], 10, 20),
            // any three bars
            entry([2, 3, 3], 5, 5),
            entry([2, 4, 4], 5, 5),
            entry([2, 2, 3], 5, 5),
            entry([3, 4, 4], 5, 5),
            entry([2, 2, 4], 5, 5),
            entry([3, 3, 4], 5, 5),
            entry([2, 3, 4], 5, 5),
        ])
    }

    /// Payout for a symbol triple regardless of reel order; 0 when no row matches.
    pub fn evaluate(&self, symbols: [Symbol; 3], double_mode: bool) -> u32 {
        let mut sorted = symbols.map(Symbol::to_index);
        sorted.sort_unstable();
        self.0
            .iter()
            .find(|e| e.combo == sorted)
            .map(|e| if double_mode { e.double } else { e.single })
            .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, e) in self.0.iter().enumerate() {
            if let Some(&bad) = e.combo.iter().find(|&&s| s as usize >= SYMBOL_COUNT) {
                return Err(ConfigError::SymbolOutOfRange(bad));
            }
            if !e.combo.windows(2).all(|w| w[0] <= w[1]) {
                return Err(ConfigError::UnsortedCombination(e.combo));
            }
            if self.0[..i].iter().any(|prev| prev.combo == e.combo) {
                return Err(ConfigError::DuplicateCombination(e.combo));
            }
        }
        Ok(())
    }
}

impl Default for Paytable {
    fn default() -> Self {
        Self::classic()
    }
}

/// Evaluates raw symbol indices against the classic table.
///
/// Panics if an index is outside the symbol domain; callers own that guarantee.
pub fn evaluate(indices: [u8; 3], double_mode: bool) -> u32 {
    let symbols = indices.map(|i| match Symbol::from_index(i) {
        Some(s) => s,
        None => panic!("symbol index {i} outside 0..{SYMBOL_COUNT}"),
    });
    CLASSIC.evaluate(symbols, double_mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_does_not_matter() {
        assert_eq!(evaluate([1, 0, 1], false), 75);
        assert_eq!(evaluate([1, 1, 0], false), 75);
        assert_eq!(evaluate([4, 3, 2], true), 5);
    }

    #[test]
    fn modes_pay_from_their_own_column() {
        assert_eq!(evaluate([0, 0, 0], false), 150);
        assert_eq!(evaluate([0, 0, 0], true), 4000);
        assert_eq!(evaluate([1, 1, 1], false), 1000);
        assert_eq!(evaluate([1, 1, 1], true), 2000);
        assert_eq!(evaluate([4, 4, 4], true), 150);
    }

    #[test]
    fn no_partial_credit() {
        assert_eq!(evaluate([1, 2, 3], false), 0);
        assert_eq!(evaluate([1, 2, 3], true), 0);
        assert_eq!(evaluate([0, 1, 2], false), 0);
        assert_eq!(evaluate([1, 1, 4], true), 0);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_domain_index_is_a_defect() {
        evaluate([0, 5, 1], false);
    }

    #[test]
    fn classic_table_is_valid() {
        assert!(Paytable::classic().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_rows() {
        let unsorted = Paytable(vec![entry([1, 0, 0], 1, 1)]);
        assert!(matches!(
            unsorted.validate(),
            Err(ConfigError::UnsortedCombination([1, 0, 0]))
        ));
        let dup = Paytable(vec![entry([0, 0, 0], 1, 1), entry([0, 0, 0], 2, 2)]);
        assert!(matches!(dup.validate(), Err(ConfigError::DuplicateCombination(_))));
        let out = Paytable(vec![entry([0, 0, 9], 1, 1)]);
        assert!(matches!(out.validate(), Err(ConfigError::SymbolOutOfRange(9))));
    }
}
