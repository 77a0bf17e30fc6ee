//! Transliteration between the encodings of an Indic writing system.
//!
//! Schemes are positional alphabet tables held by a [`scheme::SchemeRegistry`].
//! [`translit`] converts strings between them, [`lang_tag`] maps language
//! tags such as `sa-x-iso` to schemes, [`document`] rewrites the text of
//! document trees and [`negotiate`] picks the scheme a query is sent in.

pub mod catalogue;
pub mod document;
pub mod lang_tag;
pub mod negotiate;
pub mod scheme;
pub mod settings;
pub mod translit;
pub mod unicode;
