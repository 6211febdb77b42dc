//! Expression parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::pratt::*;
use chumsky::prelude::*;
use serde_json::Value;

use crate::error::EvalError;
use crate::eval::ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
use crate::eval::lexer::Token;
use crate::eval::value::number;

/// Parse expression source into an expression tree
pub fn parse(input: &str) -> Result<Expr, Vec<EvalError>> {
    let len = input.len();

    let token_iter = crate::eval::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    expression_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

enum Postfix {
    Member(String),
    Index(Expr),
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn logical(op: LogicalOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Logical {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn expression_parser<'a, I>() -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|expr| {
        let literal = select! {
            Token::Number(n) => Expr::Literal(number(n)),
            Token::String(s) => Expr::Literal(Value::String(s)),
            Token::True => Expr::Literal(Value::Bool(true)),
            Token::False => Expr::Literal(Value::Bool(false)),
            Token::Null => Expr::Literal(Value::Null),
            Token::Undefined => Expr::Literal(Value::Null),
        };

        let variable = select! { Token::Ident(name) => Expr::Variable(name) };

        let nested = expr
            .clone()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

        let primary = choice((literal, variable, nested));

        // Member and index access bind tighter than any operator
        let postfix = choice((
            just(Token::Dot)
                .ignore_then(select! { Token::Ident(name) => name })
                .map(Postfix::Member),
            expr.clone()
                .delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
                .map(Postfix::Index),
        ));

        let access = primary
            .then(postfix.repeated().collect::<Vec<_>>())
            .map(|(base, ops)| {
                ops.into_iter().fold(base, |object, op| match op {
                    Postfix::Member(name) => Expr::Member {
                        object: Box::new(object),
                        name,
                    },
                    Postfix::Index(index) => Expr::Index {
                        object: Box::new(object),
                        index: Box::new(index),
                    },
                })
            })
            .boxed();

        let unary = recursive(|unary| {
            choice((
                just(Token::Bang)
                    .ignore_then(unary.clone())
                    .map(|operand| Expr::Unary {
                        op: UnaryOp::Not,
                        operand: Box::new(operand),
                    }),
                just(Token::Minus).ignore_then(unary).map(|operand| Expr::Unary {
                    op: UnaryOp::Negate,
                    operand: Box::new(operand),
                }),
                access,
            ))
        });

        let operators = unary
            .pratt((
                // Precedence 1 (lowest): logical or
                infix(left(1), just(Token::Or), |l, _, r, _| logical(LogicalOp::Or, l, r)),
                // Precedence 2: logical and
                infix(left(2), just(Token::And), |l, _, r, _| logical(LogicalOp::And, l, r)),
                // Precedence 3: equality
                infix(left(3), just(Token::Equal), |l, _, r, _| binary(BinaryOp::Equal, l, r)),
                infix(left(3), just(Token::NotEqual), |l, _, r, _| {
                    binary(BinaryOp::NotEqual, l, r)
                }),
                infix(left(3), just(Token::StrictEqual), |l, _, r, _| {
                    binary(BinaryOp::StrictEqual, l, r)
                }),
                infix(left(3), just(Token::StrictNotEqual), |l, _, r, _| {
                    binary(BinaryOp::StrictNotEqual, l, r)
                }),
                // Precedence 4: relational
                infix(left(4), just(Token::Less), |l, _, r, _| binary(BinaryOp::Less, l, r)),
                infix(left(4), just(Token::LessOrEqual), |l, _, r, _| {
                    binary(BinaryOp::LessOrEqual, l, r)
                }),
                infix(left(4), just(Token::Greater), |l, _, r, _| {
                    binary(BinaryOp::Greater, l, r)
                }),
                infix(left(4), just(Token::GreaterOrEqual), |l, _, r, _| {
                    binary(BinaryOp::GreaterOrEqual, l, r)
                }),
                // Precedence 5: additive
                infix(left(5), just(Token::Plus), |l, _, r, _| binary(BinaryOp::Add, l, r)),
                infix(left(5), just(Token::Minus), |l, _, r, _| {
                    binary(BinaryOp::Subtract, l, r)
                }),
                // Precedence 6: multiplicative
                infix(left(6), just(Token::Star), |l, _, r, _| {
                    binary(BinaryOp::Multiply, l, r)
                }),
                infix(left(6), just(Token::Slash), |l, _, r, _| binary(BinaryOp::Divide, l, r)),
                infix(left(6), just(Token::Percent), |l, _, r, _| {
                    binary(BinaryOp::Remainder, l, r)
                }),
            ))
            .boxed();

        // Ternary is right-associative and sits below every binary operator
        operators
            .then(
                just(Token::Question)
                    .ignore_then(expr.clone())
                    .then_ignore(just(Token::Colon))
                    .then(expr)
                    .or_not(),
            )
            .map(|(condition, branches)| match branches {
                Some((then, otherwise)) => Expr::Conditional {
                    condition: Box::new(condition),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                },
                None => condition,
            })
    })
}
