/// Trait for workorders that can be matched across both systems by their natural key
pub trait NaturalKey {
    /// Returns the natural key (`orderNo` on the customer side, `number` in TracOS)
    fn natural_key(&self) -> i64;
}
