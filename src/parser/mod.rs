// Parser module: INSERT line classification and VALUES tokenizing.

pub mod insert;
pub mod values;

// One table record: field strings in the column order the dump used.
// NULL is already normalized to the empty string.
pub type Row = Vec<String>;
