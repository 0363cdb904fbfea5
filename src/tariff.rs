//! 잡초 피복률 구간별 헥타르당 단가표.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// 단가표 한 줄. `key`는 배타적 상한(%)이다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierEntry {
    pub key: u32,
    pub value_per_hectare: f64,
}

/// 조회 결과로 얻은 구간.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    /// 구간 키(상한 %)
    pub key: u32,
    /// 헥타르당 금액
    pub value_per_hectare: f64,
}

/// 단가표 구성 시 발생 가능한 오류.
#[derive(Debug, Error, PartialEq)]
pub enum TariffError {
    #[error("tier table is empty")]
    Empty,
    #[error("duplicate tier key: {0}")]
    DuplicateKey(u32),
    #[error("invalid value for tier {key}: {value}")]
    InvalidValue { key: u32, value: f64 },
    #[error("invalid tariff constant {name}: {value}")]
    InvalidConstant { name: &'static str, value: f64 },
    #[error("band limits out of order: low_max {low_max} > medium_max {medium_max}")]
    BandOrder { low_max: f64, medium_max: f64 },
}

/// 오름차순으로 정렬된 불변 단가표.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    entries: Vec<TierEntry>,
}

/// 기준 단가표 (키 %, 헥타르당 금액).
pub const REFERENCE_TIERS: [(u32, f64); 19] = [
    (2, 58362.0),
    (3, 64847.0),
    (4, 72952.0),
    (5, 83374.0),
    (6, 97270.0),
    (7, 116724.0),
    (10, 145905.0),
    (12, 166749.0),
    (14, 194541.0),
    (15, 216156.0),
    (16, 233449.0),
    (17, 265283.0),
    (28, 291811.0),
    (39, 343308.0),
    (55, 389082.0),
    (65, 486353.0),
    (75, 583623.0),
    (85, 833748.0),
    (100, 1167247.0),
];

/// 기준 단가표를 `TierEntry` 목록으로 돌려준다.
pub fn reference_entries() -> Vec<TierEntry> {
    REFERENCE_TIERS
        .iter()
        .map(|&(key, value_per_hectare)| TierEntry {
            key,
            value_per_hectare,
        })
        .collect()
}

impl TierTable {
    /// 항목을 정렬해 단가표를 만든다. 빈 표, 중복 키, 음수/비유한 금액은 거부한다.
    pub fn new(mut entries: Vec<TierEntry>) -> Result<Self, TariffError> {
        if entries.is_empty() {
            return Err(TariffError::Empty);
        }
        entries.sort_by_key(|e| e.key);
        for pair in entries.windows(2) {
            if pair[0].key == pair[1].key {
                return Err(TariffError::DuplicateKey(pair[0].key));
            }
        }
        if let Some(bad) = entries
            .iter()
            .find(|e| !e.value_per_hectare.is_finite() || e.value_per_hectare < 0.0)
        {
            return Err(TariffError::InvalidValue {
                key: bad.key,
                value: bad.value_per_hectare,
            });
        }
        Ok(Self { entries })
    }

    /// 기준 데이터로 만든 단가표.
    pub fn reference() -> Self {
        Self {
            entries: reference_entries(),
        }
    }

    /// 비율보다 큰 최소 키의 구간을 이진 탐색으로 찾는다.
    ///
    /// 경계값과 정확히 같은 비율은 다음 구간으로 넘어간다. 모든 키 이상이거나
    /// NaN이면 `None`.
    pub fn lookup(&self, percentage: f64) -> Option<Tier> {
        let idx = self
            .entries
            .partition_point(|e| !(percentage < f64::from(e.key)));
        let found = self.entries.get(idx).map(|e| Tier {
            key: e.key,
            value_per_hectare: e.value_per_hectare,
        });
        debug!(percentage, index = idx, ?found, "tier lookup");
        found
    }

    pub fn entries(&self) -> &[TierEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_is_sorted_and_unique() {
        let table = TierTable::reference();
        assert_eq!(table.len(), 19);
        assert!(table.entries().windows(2).all(|w| w[0].key < w[1].key));
        assert_eq!(TierTable::new(reference_entries()), Ok(table));
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let table = TierTable::new(vec![
            TierEntry { key: 10, value_per_hectare: 3.0 },
            TierEntry { key: 2, value_per_hectare: 1.0 },
            TierEntry { key: 5, value_per_hectare: 2.0 },
        ])
        .unwrap();
        let keys: Vec<u32> = table.entries().iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![2, 5, 10]);
        assert_eq!(table.lookup(4.0).map(|t| t.key), Some(5));
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(TierTable::new(vec![]), Err(TariffError::Empty));
        let dup = vec![
            TierEntry { key: 3, value_per_hectare: 1.0 },
            TierEntry { key: 3, value_per_hectare: 2.0 },
        ];
        assert_eq!(TierTable::new(dup), Err(TariffError::DuplicateKey(3)));
        let neg = vec![TierEntry { key: 3, value_per_hectare: -1.0 }];
        assert!(matches!(
            TierTable::new(neg),
            Err(TariffError::InvalidValue { key: 3, .. })
        ));
    }
}
