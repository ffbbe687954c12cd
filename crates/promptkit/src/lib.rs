//! # promptkit
//!
//! Typed interactive questions with validation.
//!
//! A [`Question`] describes what is asked (free text, a path, yes/no, one or
//! several of a list), an optional default and an optional [`Validator`].
//! A [`Prompter`] asks it and returns an [`Answer`], re-prompting with the
//! validator's reason until the input is valid.
//!
//! Two backends implement [`Prompter`]:
//!
//! - [`RichPrompter`]: dialoguer menus for interactive terminals
//! - [`LinePrompter`]: plain lines over any reader/writer pair
//!
//! [`select_backend`] picks one by probing the terminal.
//!
//! ## Example
//!
//! ```
//! use promptkit::{LinePrompter, Prompter, Question, Validator};
//! use std::io::Cursor;
//!
//! let mut prompter = LinePrompter::new(Cursor::new(b"\n".to_vec()), Vec::new());
//! let port = prompter
//!     .ask_text(
//!         &Question::text("Server port")
//!             .with_default("8080")
//!             .with_validator(Validator::VALID_PORT),
//!     )
//!     .unwrap();
//! assert_eq!(port, "8080");
//! ```

pub mod error;
pub mod line;
pub mod prompter;
pub mod question;
pub mod rich;
pub mod validate;

pub use error::{Error, Result, ValidationError};
pub use line::LinePrompter;
pub use prompter::{Backend, Prompter, select_backend};
pub use question::{Answer, Question, QuestionKind};
pub use rich::RichPrompter;
pub use validate::{Validator, expand_path, non_empty, path_exists, valid_port};
