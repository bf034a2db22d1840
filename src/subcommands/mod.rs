/// Reorder a transformation to pull linearizing fissions to the front
pub mod decircularize;

/// Per-genome chromosome counts from a GRIMM file
pub mod karyotype;

/// Ancestral genome recovery by reverse replay of a 2-break history
pub mod recover;
