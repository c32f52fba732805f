/// The `mcmeta` module writes and reads `pack.mcmeta` files, the descriptor
/// every Minecraft resource pack carries at its root to declare its pack format,
/// the range of formats it supports and a description.
pub mod mcmeta;

/// The `archive` module turns a staged pack directory into a distributable
/// `.zip` and removes the staging directory once the archive is safely in place.
///
/// It also computes the SHA-1 digest servers publish alongside a pack download.
pub mod archive;

/// The `random_word` module produces short random lowercase strings, used to keep
/// staging directory names from colliding between builds.
pub mod random_word;

/// The `template` module renders text templates with `{name}` placeholders,
/// either strictly (every placeholder must be known) or leniently for listing pages.
pub mod template;

/// The `frontmatter` module splits markdown documents into `---` delimited
/// key/value fields and a body.
pub mod frontmatter;

/// Shared file helpers: `~` expansion, reading, writing and removal.
pub mod filesystem;
