// Command parsers for reconfiguration scripts

use super::ast::Command;
use super::lexer::{column_name, identifier, ws};
use crate::sort::SortOrder;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, map_res, value},
    error::{Error, ErrorKind},
    multi::separated_list1,
    sequence::{preceded, tuple},
    IResult,
};

#[derive(Debug)]
enum AxesArg {
    Numeric(String),
    X(String),
    Y(String),
    Order(SortOrder),
}

fn named<'a, O, F>(key: &'static str, inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    preceded(tuple((ws(tag(key)), ws(char(':')))), ws(inner))
}

fn sort_order(input: &str) -> IResult<&str, SortOrder> {
    map_res(identifier, |s| s.parse::<SortOrder>())(input)
}

fn axes_arg(input: &str) -> IResult<&str, AxesArg> {
    alt((
        map(named("numeric", column_name), AxesArg::Numeric),
        map(named("order", sort_order), AxesArg::Order),
        map(named("x", column_name), AxesArg::X),
        map(named("y", column_name), AxesArg::Y),
    ))(input)
}

/// Parse an axes command
/// Format: axes(numeric: col, x: col, y: col) or axes(..., order: desc), arguments in any order
pub fn parse_axes(input: &str) -> IResult<&str, Command> {
    let (input, _) = ws(tag("axes"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, args) = separated_list1(ws(char(',')), axes_arg)(input)?;
    let (input, _) = ws(char(')'))(input)?;

    let mut numeric = None;
    let mut x = None;
    let mut y = None;
    let mut order = None;

    for arg in args {
        match arg {
            AxesArg::Numeric(c) => numeric = Some(c),
            AxesArg::X(c) => x = Some(c),
            AxesArg::Y(c) => y = Some(c),
            AxesArg::Order(o) => order = Some(o),
        }
    }

    match (numeric, x, y) {
        (Some(numeric), Some(x), Some(y)) => Ok((
            input,
            Command::Axes {
                numeric,
                x,
                y,
                order,
            },
        )),
        _ => Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
    }
}

/// Parse a command that takes no arguments, e.g. transpose()
fn bare<'a>(name: &'static str, command: Command) -> impl FnMut(&'a str) -> IResult<&'a str, Command> {
    value(
        command,
        tuple((ws(tag(name)), ws(char('(')), ws(char(')')))),
    )
}

/// Parse any command
pub fn parse_command(input: &str) -> IResult<&str, Command> {
    alt((
        parse_axes,
        bare("transpose", Command::Transpose),
        bare("rerender", Command::Rerender),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_axes() {
        let result = parse_axes("axes(numeric: amount, x: product, y: region)");
        assert!(result.is_ok());
        let (_, cmd) = result.unwrap();
        assert_eq!(
            cmd,
            Command::Axes {
                numeric: "amount".to_string(),
                x: "product".to_string(),
                y: "region".to_string(),
                order: None,
            }
        );
    }

    #[test]
    fn test_parse_axes_with_order_any_position() {
        let (_, cmd) = parse_axes(r#"axes( order: descending , y: "sales region", numeric: amount, x: product )"#).unwrap();
        match cmd {
            Command::Axes { y, order, .. } => {
                assert_eq!(y, "sales region");
                assert_eq!(order, Some(SortOrder::Desc));
            }
            _ => panic!("Expected Axes command"),
        }
    }

    #[test]
    fn test_parse_axes_missing_column() {
        assert!(parse_axes("axes(numeric: amount, x: product)").is_err());
    }

    #[test]
    fn test_parse_axes_bad_order() {
        assert!(parse_axes("axes(numeric: a, x: b, y: c, order: sideways)").is_err());
    }

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(parse_command("transpose()"), Ok(("", Command::Transpose)));
        assert_eq!(parse_command(" rerender ( ) "), Ok(("", Command::Rerender)));
        assert!(parse_command("transpose").is_err());
    }
}
