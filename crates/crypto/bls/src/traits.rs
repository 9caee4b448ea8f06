use crate::signature::BLSSignature;

pub trait Aggregatable<T> {
    type Error;

    /// Aggregates several items of the same kind into one.
    ///
    /// For signatures this is point addition on G2; every input is group checked first, so a
    /// well-encoded point that is not on the curve yields an error instead of a bogus aggregate.
    fn aggregate(items: &[&T]) -> Result<T, Self::Error>;
}

pub trait Signable {
    type Error;

    fn sign(&self, message: &[u8]) -> Result<BLSSignature, Self::Error>;
}
