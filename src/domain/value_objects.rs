use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 利用者ID - 学内の利用者アカウント（学生・教職員）への参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReaderId(Uuid);

impl ReaderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for ReaderId {
    fn default() -> Self {
        Self::new()
    }
}

/// 書籍ID - 蔵書目録の1タイトルへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

/// 貸出ID - 1回の貸出記録
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorrowId(Uuid);

impl BorrowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BorrowId {
    fn default() -> Self {
        Self::new()
    }
}

/// 負の件数が渡された
///
/// 呼び出し側の統合ミスとして扱い、0への丸めは行わない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("count out of range (must be non-negative): {0}")]
pub struct NegativeCountError(pub i64);

/// 残り貸出枠
///
/// 不変条件：0以上。減算は`checked_decrement`経由のみで、0を下回る値は作れない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreditBalance(u32);

impl CreditBalance {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// 枠を使い切っているか
    pub fn is_exhausted(&self) -> bool {
        self.0 == 0
    }

    /// 1冊分の枠を消費する。使い切っている場合は`None`
    pub fn checked_decrement(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl TryFrom<i64> for CreditBalance {
    type Error = NegativeCountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| NegativeCountError(value))
    }
}

/// 貸出可能な在庫冊数
///
/// 不変条件：0以上。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CopyCount(u32);

impl CopyCount {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// 1冊貸し出す。在庫がない場合は`None`
    pub fn checked_decrement(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl TryFrom<i64> for CopyCount {
    type Error = NegativeCountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| NegativeCountError(value))
    }
}

/// エンティティのリビジョン
///
/// 書き込みのたびに1ずつ増える。楽観的排他制御のトークンとして使用する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Revision(u64);

impl Revision {
    /// 新規作成時のリビジョン
    pub fn initial() -> Self {
        Self(1)
    }

    pub fn from_value(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_balance_decrement() {
        let credits = CreditBalance::new(1);
        let after = credits.checked_decrement().unwrap();
        assert_eq!(after.value(), 0);
        assert!(after.is_exhausted());
    }

    #[test]
    fn test_credit_balance_cannot_go_negative() {
        let credits = CreditBalance::new(0);
        assert_eq!(credits.checked_decrement(), None);
    }

    #[test]
    fn test_credit_balance_try_from_negative_is_rejected() {
        let result = CreditBalance::try_from(-1);
        assert_eq!(result.unwrap_err(), NegativeCountError(-1));
    }

    #[test]
    fn test_negative_count_error_message() {
        assert_eq!(
            NegativeCountError(-2).to_string(),
            "count out of range (must be non-negative): -2"
        );
    }

    #[test]
    fn test_credit_balance_try_from_valid() {
        assert_eq!(CreditBalance::try_from(0).unwrap().value(), 0);
        assert_eq!(CreditBalance::try_from(5).unwrap().value(), 5);
    }

    #[test]
    fn test_copy_count_cannot_go_negative() {
        let copies = CopyCount::new(0);
        assert!(copies.is_empty());
        assert_eq!(copies.checked_decrement(), None);
    }

    #[test]
    fn test_copy_count_try_from_negative_is_rejected() {
        assert!(CopyCount::try_from(-3).is_err());
        // u32に収まらない値も不正として扱う
        assert!(CopyCount::try_from(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_revision_next() {
        let revision = Revision::initial();
        assert_eq!(revision.value(), 1);
        assert_eq!(revision.next().value(), 2);
    }

    #[test]
    fn test_reader_id_creation() {
        let id1 = ReaderId::new();
        let id2 = ReaderId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_book_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = BookId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }
}
