// Pipeline parser for reconfiguration scripts

use super::ast::Script;
use super::command::parse_command;
use super::lexer::ws;
use nom::{
    bytes::complete::tag,
    combinator::{eof, opt},
    multi::separated_list1,
    IResult,
};

/// Parse a complete script
/// Format: command | command | ...
pub fn parse_script(input: &str) -> IResult<&str, Script> {
    // A leading "|" is tolerated
    let (input, _) = opt(ws(tag("|")))(input)?;

    let (input, commands) = separated_list1(ws(tag("|")), parse_command)(input)?;

    // Consume trailing whitespace and ensure end of input
    let (input, _) = ws(eof)(input)?;

    Ok((input, Script { commands }))
}
