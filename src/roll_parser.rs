use crate::rules::{
    dice_set::{KeepMode, default_keep_count},
    roll_spec::{Action, Keep, RollSpec},
};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, value},
    sequence::preceded,
};

/// Parses an identifier such as `total_d20_with_advantage_plus3`.
///
/// Returns `None` when the identifier is not a roll identifier at all.
pub fn parse_identifier(input: &str) -> Option<RollSpec> {
    all_consuming(identifier)
        .parse(input)
        .ok()
        .map(|(_, spec)| spec)
}

fn identifier(input: &str) -> IResult<&str, RollSpec> {
    let (input, (action, count, sides, keep, modifier)) = (
        action,
        preceded(char('_'), opt(number)),
        preceded(char('d'), number),
        opt(preceded(char('_'), keep_clause)),
        opt(preceded(char('_'), modifier)),
    )
        .parse(input)?;

    let count = count.unwrap_or(if keep.is_some() { 2 } else { 1 });
    let keep = keep.map(|(mode, keep_count)| Keep {
        mode,
        count: keep_count.unwrap_or_else(|| default_keep_count(count)),
    });

    Ok((
        input,
        RollSpec {
            action,
            sides,
            count,
            keep,
            modifier,
        },
    ))
}

fn action(input: &str) -> IResult<&str, Action> {
    alt((
        value(Action::Roll, tag("roll")),
        value(Action::Total, tag("total")),
    ))
    .parse(input)
}

fn keep_clause(input: &str) -> IResult<&str, (KeepMode, Option<u32>)> {
    (
        alt((
            value(KeepMode::Highest, tag("with_advantage")),
            value(KeepMode::Highest, tag("highest")),
            value(KeepMode::Lowest, tag("with_disadvantage")),
            value(KeepMode::Lowest, tag("lowest")),
        )),
        opt(number),
    )
        .parse(input)
}

fn modifier(input: &str) -> IResult<&str, i32> {
    map(
        (
            alt((
                value(1, tag("plus")),
                value(1, tag("p")),
                value(-1, tag("minus")),
                value(-1, tag("m")),
            )),
            map_res(digit1, |s: &str| s.parse::<i32>()),
        ),
        |(sign, magnitude)| sign * magnitude,
    )
    .parse(input)
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>()).parse(input)
}
