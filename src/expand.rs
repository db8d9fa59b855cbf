//! Alias and variable expansion of a segment before it is tokenized.

use crate::alias::Aliases;
use crate::lexer::{first_word, split_into_tokens};
use crate::session::Session;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(\?|\$|[A-Za-z0-9_]+)").expect("variable pattern is valid")
});

/// Replaces the first word of `segment` with its alias value, if it has one.
///
/// The substituted text is not looked up again, so aliases that refer to
/// themselves or to each other cannot loop.
pub fn expand_alias<'a>(segment: &'a str, aliases: &Aliases) -> Cow<'a, str> {
    let Some((start, word)) = first_word(segment) else {
        return Cow::Borrowed(segment);
    };
    match aliases.get(word) {
        Some(value) => {
            let rest = &segment[start + word.len()..];
            log::trace!("alias {word} -> {value}");
            Cow::Owned(format!("{}{value}{rest}", &segment[..start]))
        }
        None => Cow::Borrowed(segment),
    }
}

/// Replaces `$?`, `$$` and `$NAME` references.
///
/// Unset variables expand to nothing; a `$` that starts none of these forms is
/// kept as is.
pub fn expand_vars<'a>(text: &'a str, session: &Session) -> Cow<'a, str> {
    VARIABLE.replace_all(text, |caps: &Captures<'_>| match &caps[1] {
        "?" => session.last_status.to_string(),
        "$" => std::process::id().to_string(),
        name => session.env.get_var(name).unwrap_or_default().to_string(),
    })
}

/// Runs both expansion passes on a segment and splits the result into words.
pub fn expand_segment(segment: &str, session: &Session) -> Vec<String> {
    let aliased = expand_alias(segment, &session.aliases);
    let expanded = expand_vars(&aliased, session);
    split_into_tokens(&expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use crate::session::SessionConfig;

    fn session() -> Session {
        let env = Environment::from_vars(
            [("HOME", "/home/user"), ("EMPTY", "")],
            std::env::temp_dir(),
        );
        Session::new(SessionConfig::default(), env)
    }

    #[test]
    fn alias_expands_to_several_words() {
        let mut s = session();
        s.aliases.set("ll", "ls -la");
        assert_eq!(expand_segment("ll /tmp", &s), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn alias_only_applies_to_first_word() {
        let mut s = session();
        s.aliases.set("ll", "ls -la");
        assert_eq!(expand_alias("echo ll", &s.aliases), "echo ll");
        assert_eq!(expand_alias("  ll", &s.aliases), "  ls -la");
    }

    #[test]
    fn alias_is_single_pass() {
        let mut s = session();
        s.aliases.set("a", "b x");
        s.aliases.set("b", "a y");
        assert_eq!(expand_segment("a", &s), vec!["b", "x"]);
        s.aliases.set("ls", "ls -F");
        assert_eq!(expand_segment("ls", &s), vec!["ls", "-F"]);
    }

    #[test]
    fn alias_value_with_equals_is_not_a_name() {
        let mut s = session();
        s.aliases.set("x", "y=echo");
        assert_eq!(expand_alias("x=y hello", &s.aliases), "x=y hello");
        assert_eq!(expand_segment("x=y hello", &s), vec!["x=y", "hello"]);
        assert_eq!(expand_segment("x hello", &s), vec!["y=echo", "hello"]);
    }

    #[test]
    fn last_status_expands() {
        let mut s = session();
        s.last_status = 1;
        assert_eq!(expand_vars("echo $?", &s), "echo 1");
    }

    #[test]
    fn pid_expands() {
        let s = session();
        assert_eq!(expand_vars("$$", &s), std::process::id().to_string());
    }

    #[test]
    fn names_expand_or_vanish() {
        let s = session();
        assert_eq!(expand_vars("cd $HOME/x", &s), "cd /home/user/x");
        assert_eq!(expand_segment("echo $NOPE end", &s), vec!["echo", "end"]);
        assert_eq!(expand_vars("[$EMPTY]", &s), "[]");
    }

    #[test]
    fn bare_dollar_is_literal() {
        let s = session();
        assert_eq!(expand_vars("cost $ 5 $-x $", &s), "cost $ 5 $-x $");
    }

    #[test]
    fn alias_value_variables_are_expanded() {
        let mut s = session();
        s.aliases.set("home", "echo $HOME");
        assert_eq!(expand_segment("home", &s), vec!["echo", "/home/user"]);
    }
}
