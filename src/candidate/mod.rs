//! Candidate selection shared by the Hough detectors and the matcher.

pub(crate) mod topk;
