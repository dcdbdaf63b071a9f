//! Flag definitions — the declarative shape of a single flag.

/// Value grammar a flag's textual value must satisfy.
///
/// A closed sum type so that value parsing dispatch is exhaustive and
/// compiler-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `true/false/yes/no/1/0`, or bare presence; `--no<name>` inverts.
    Boolean,
    /// Strict `i64` parse.
    Integer,
    /// Strict `f64` parse.
    Double,
    /// `<number><unit>` pairs with units `d h m s ms`; bare number is seconds.
    Duration,
    /// `@repo//pkg:target` and relative forms — shape only, no existence check.
    Label,
    /// Accepted verbatim into a `PathBuf`.
    Path,
    /// Case-sensitive membership in a fixed set.
    OneOf(&'static [&'static str]),
    /// `auto` plus the boolean synonyms, three-valued.
    TriState,
    /// Opaque text (e.g. `name=value` assignments) — never rejected here.
    Unknown,
}

/// A single flag definition.
///
/// Instances are constructed once from the static table and never mutated;
/// the resolution engine only ever holds `&FlagDefinition`.
#[derive(Debug, Clone)]
pub struct FlagDefinition {
    /// Canonical name, underscore form (e.g. `keep_going`). Globally unique.
    pub name: &'static str,
    /// Historical name that must resolve identically to `name`.
    pub old_name: Option<&'static str>,
    /// Single-character short form (e.g. `-k`), unique per command scope.
    pub abbrev: Option<char>,
    /// Grammar for the flag's value.
    pub value_kind: ValueKind,
    /// Repeated occurrences accumulate in order instead of last-wins.
    pub allow_multiple: bool,
    /// Textual default, parsed lazily with the same grammar.
    pub default_value: Option<&'static str>,
    /// Sub-commands for which the flag is legal. Never empty; `startup`
    /// never mixes with other commands.
    pub commands: &'static [&'static str],
    /// Non-empty marks the flag as pure shorthand for these flag tokens.
    pub expands_to: &'static [&'static str],
    /// Advisory only — affects diagnostic severity, never resolution.
    pub deprecated: bool,
    /// Advisory only — affects diagnostic severity, never resolution.
    pub experimental: bool,
    /// One-line description for diagnostics and help text.
    pub help: &'static str,
}

impl FlagDefinition {
    /// Minimal definition; chain the setters below for the rest.
    pub fn new(
        name: &'static str,
        value_kind: ValueKind,
        commands: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            old_name: None,
            abbrev: None,
            value_kind,
            allow_multiple: false,
            default_value: None,
            commands,
            expands_to: &[],
            deprecated: false,
            experimental: false,
            help: "",
        }
    }

    pub fn old_name(mut self, old_name: &'static str) -> Self {
        self.old_name = Some(old_name);
        self
    }

    pub fn abbrev(mut self, abbrev: char) -> Self {
        self.abbrev = Some(abbrev);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.allow_multiple = true;
        self
    }

    pub fn default(mut self, default_value: &'static str) -> Self {
        self.default_value = Some(default_value);
        self
    }

    pub fn expands_to(mut self, tokens: &'static [&'static str]) -> Self {
        self.expands_to = tokens;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn experimental(mut self) -> Self {
        self.experimental = true;
        self
    }

    pub fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }

    /// True if the flag is pure shorthand for other flags.
    pub fn is_expansion(&self) -> bool {
        !self.expands_to.is_empty()
    }

    /// True if the flag is declared applicable to `command`.
    pub fn applies_to(&self, command: &str) -> bool {
        self.commands.iter().any(|c| *c == command)
    }
}
