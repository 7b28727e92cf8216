pub(crate) mod search;
pub(crate) mod serve;
pub(crate) mod students;
