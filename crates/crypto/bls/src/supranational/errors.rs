use blst::BLST_ERROR;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BlstError {
    #[error("bad encoding")]
    BadEncoding,
    #[error("point not on curve")]
    PointNotOnCurve,
    #[error("point not in group")]
    PointNotInGroup,
    #[error("aggregate type mismatch")]
    AggregateTypeMismatch,
    #[error("verification failed")]
    VerifyFail,
    #[error("public key is infinity")]
    PublicKeyIsInfinity,
    #[error("bad scalar")]
    BadScalar,
    #[error("unexpected blst status: {0}")]
    Unexpected(String),
}

impl From<BLST_ERROR> for BlstError {
    fn from(value: BLST_ERROR) -> Self {
        match value {
            BLST_ERROR::BLST_BAD_ENCODING => BlstError::BadEncoding,
            BLST_ERROR::BLST_POINT_NOT_ON_CURVE => BlstError::PointNotOnCurve,
            BLST_ERROR::BLST_POINT_NOT_IN_GROUP => BlstError::PointNotInGroup,
            BLST_ERROR::BLST_AGGR_TYPE_MISMATCH => BlstError::AggregateTypeMismatch,
            BLST_ERROR::BLST_VERIFY_FAIL => BlstError::VerifyFail,
            BLST_ERROR::BLST_PK_IS_INFINITY => BlstError::PublicKeyIsInfinity,
            BLST_ERROR::BLST_BAD_SCALAR => BlstError::BadScalar,
            other => BlstError::Unexpected(format!("{other:?}")),
        }
    }
}
