use winnow::combinator::{cut_err, delimited, opt, preceded, repeat, separated};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::{Bound, FieldType, Format, Number, Presence, RuleToken};

// -- Rule lists -------------------------------------------------------------

/// `required|string|max:255` → `["required", "string", "max:255"]`.
/// Blank entries are kept; the caller drops them.
pub fn rule_list<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    let items: Vec<&str> =
        separated(1.., take_while(0.., |c: char| c != '|'), '|').parse_next(input)?;
    Ok(items)
}

// -- Single tokens ----------------------------------------------------------

fn rule_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        .parse_next(input)
}

fn rule_args<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    let args: Vec<&str> = preceded(
        ':',
        separated(1.., take_while(0.., |c: char| c != ','), ','),
    )
    .parse_next(input)?;
    Ok(args)
}

/// `in:a,b,c` → `("in", ["a", "b", "c"])`. A bare keyword has no args.
pub fn rule_token<'i>(input: &mut &'i str) -> ModalResult<(&'i str, Vec<&'i str>)> {
    let name = rule_name.parse_next(input)?;
    let args = opt(rule_args).parse_next(input)?.unwrap_or_default();
    Ok((name, args))
}

// -- Field paths ------------------------------------------------------------

/// One dot-separated piece of a path: a head and any bracket suffixes,
/// e.g. `items[*]` is head `items` with brackets `["*"]`.
#[derive(Debug)]
pub struct PathComponent<'i> {
    pub head: &'i str,
    pub brackets: Vec<&'i str>,
}

fn path_head<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., |c: char| c != '.' && c != '[').parse_next(input)
}

fn bracket<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited(
        '[',
        take_while(0.., |c: char| c != ']' && c != '.'),
        cut_err(']'),
    )
    .parse_next(input)
}

fn path_component<'i>(input: &mut &'i str) -> ModalResult<PathComponent<'i>> {
    let head = path_head.parse_next(input)?;
    let brackets: Vec<&str> = repeat(0.., bracket).parse_next(input)?;
    Ok(PathComponent { head, brackets })
}

pub fn field_path<'i>(input: &mut &'i str) -> ModalResult<Vec<PathComponent<'i>>> {
    let components: Vec<PathComponent<'i>> =
        separated(1.., path_component, '.').parse_next(input)?;
    Ok(components)
}

// -- Vocabulary -------------------------------------------------------------

fn number(arg: &str) -> Option<Number> {
    let n: Number = arg.parse().ok()?;
    n.as_f64().is_finite().then_some(n)
}

fn enum_value(arg: &str) -> String {
    let arg = arg.trim();
    arg.strip_prefix('"')
        .and_then(|a| a.strip_suffix('"'))
        .unwrap_or(arg)
        .to_owned()
}

/// Map a split token onto the known vocabulary. `None` means unrecognized.
pub fn classify(name: &str, args: &[&str]) -> Option<RuleToken> {
    let token = match (name, args) {
        ("required", []) => RuleToken::Presence(Presence::Required),
        ("nullable", []) => RuleToken::Presence(Presence::Nullable),
        ("sometimes", []) => RuleToken::Presence(Presence::Sometimes),

        ("string", []) => RuleToken::Type(FieldType::String),
        ("integer" | "int", []) => RuleToken::Type(FieldType::Integer),
        ("numeric", []) => RuleToken::Type(FieldType::Number),
        ("boolean" | "bool", []) => RuleToken::Type(FieldType::Boolean),
        // `array:a,b` restricts the allowed keys; still an array.
        ("array", _) => RuleToken::Type(FieldType::Array),
        ("object", []) => RuleToken::Type(FieldType::Object),
        ("file" | "image", _) => RuleToken::Type(FieldType::File),
        ("mimes" | "mimetypes", [_, ..]) => RuleToken::Type(FieldType::File),

        ("email", _) => RuleToken::Format(Format::Email),
        ("url", _) => RuleToken::Format(Format::Uri),
        ("uuid", []) => RuleToken::Format(Format::Uuid),
        ("date", []) => RuleToken::Format(Format::Date),
        ("date_format", [_, ..]) => RuleToken::Format(Format::DateTime),
        ("ipv4", []) => RuleToken::Format(Format::Ipv4),
        ("ipv6", []) => RuleToken::Format(Format::Ipv6),

        ("min", [n]) => RuleToken::Bound(Bound::Min(number(n)?)),
        ("max", [n]) => RuleToken::Bound(Bound::Max(number(n)?)),
        ("size", [n]) => RuleToken::Bound(Bound::Size(number(n)?)),
        ("between", [lo, hi]) => RuleToken::Bound(Bound::Between(number(lo)?, number(hi)?)),

        ("in", _) => {
            let values: Vec<String> = args
                .iter()
                .map(|a| enum_value(a))
                .filter(|v| !v.is_empty())
                .collect();
            if values.is_empty() {
                return None;
            }
            RuleToken::Membership(values)
        }

        _ => return None,
    };
    Some(token)
}
