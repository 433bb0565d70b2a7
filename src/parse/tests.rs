use super::*;
use crate::ast::CmpOperand;
use crate::isa::{Amount, Comparator, EventKind, Imm, Stat, Target};

// Token streams are written by hand here, with made-up but increasing pcs.
fn tokens(kinds: Vec<TokenKind>) -> Vec<Token> {
    kinds.into_iter().enumerate().map(|(i, kind)| Token::new(i + 1, kind)).collect()
}

fn amount(x: u8) -> Amount { Amount::new(x).unwrap() }

fn draw(x: u8) -> TokenKind { TokenKind::Draw { amount: amount(x) } }
fn damage(target: Target, x: u8) -> TokenKind { TokenKind::Damage { target, amount: amount(x) } }
fn when(event: EventKind) -> TokenKind { TokenKind::When { event } }
fn if_gt_imm_stat() -> TokenKind {
    TokenKind::If {
        cmp: Comparator::Gt,
        lhs: CmpOperand::Imm { value: Imm::new(5).unwrap() },
        rhs: CmpOperand::StatOf { target: Target::Opponent, stat: Stat::Attack },
    }
}

#[test]
fn simple() {
    let parsed = parse(&tokens(vec![damage(Target::Opponent, 3), TokenKind::End]));
    assert!(parsed.is_ok());
    let program = parsed.program.unwrap();
    assert_eq!(program.end_pc, 2);
    assert_eq!(program.top_level, vec![TopLevelStmt::Stmt(Stmt {
        pc: 1, kind: StmtKind::Damage { target: Target::Opponent, amount: amount(3) },
    })]);
}

#[test]
fn nested_blocks() {
    let parsed = parse(&tokens(vec![
        draw(1),
        when(EventKind::OnAttack),
        if_gt_imm_stat(),
        damage(Target::Opponent, 2),
        TokenKind::Else,
        TokenKind::Heal { target: Target::SelfCard, amount: amount(1) },
        TokenKind::EndIf,
        TokenKind::EndWhen,
        when(EventKind::OnEnter),
        TokenKind::BuffStat { target: Target::SelfCard, stat: Stat::Attack, amount: amount(1) },
        TokenKind::EndWhen,
        TokenKind::End,
    ]));
    assert!(parsed.is_ok(), "{:?}", parsed.errors);
    let program = parsed.program.unwrap();

    let whens = program.top_level.iter().filter_map(TopLevelStmt::as_when).collect::<Vec<_>>();
    assert_eq!(whens.len(), 2);
    assert_eq!(whens[0].event, EventKind::OnAttack);
    assert_eq!(whens[0].body.len(), 1);

    let cond = whens[0].body[0].kind.as_if().unwrap();
    assert_eq!(cond.then_branch.len(), 1);
    assert_eq!(cond.else_branch.as_ref().map(Vec::len), Some(1));
    assert_eq!(whens[1].body.len(), 1);
    assert_eq!(program.end_pc, 12);
}

#[test]
fn end_pc_is_consumed_terminator() {
    // stuff after the terminator is not looked at
    let parsed = parse(&tokens(vec![draw(1), TokenKind::End, draw(2), TokenKind::End]));
    let program = parsed.program.unwrap();
    assert_eq!(program.end_pc, 2);
    assert_eq!(program.top_level.len(), 1);
}

#[test]
fn stray_delimiters_are_dropped() {
    let parsed = parse(&tokens(vec![
        TokenKind::EndWhen,
        TokenKind::Else,
        draw(1),
        TokenKind::EndIf,
        TokenKind::End,
    ]));
    assert!(parsed.is_ok(), "{:?}", parsed.errors);
    assert_eq!(parsed.program.unwrap().top_level.len(), 1);
}

#[test]
fn nested_when_is_dropped() {
    let parsed = parse(&tokens(vec![
        when(EventKind::OnCast),
        when(EventKind::OnDeath),
        draw(1),
        TokenKind::EndWhen,
        TokenKind::End,
    ]));
    assert!(parsed.is_ok(), "{:?}", parsed.errors);
    let program = parsed.program.unwrap();
    assert_eq!(program.top_level.len(), 1);
    let outer = program.top_level[0].as_when().unwrap();
    assert_eq!(outer.event, EventKind::OnCast);
    // the inner WHEN's body is absorbed into the outer one
    assert_eq!(outer.body.len(), 1);
}

#[test]
fn when_inside_conditional_is_dropped() {
    let parsed = parse(&tokens(vec![
        if_gt_imm_stat(),
        when(EventKind::OnDeath),
        draw(1),
        // not a stop token for the branch, so it goes too
        TokenKind::EndWhen,
        TokenKind::EndIf,
        TokenKind::End,
    ]));
    assert!(parsed.is_ok(), "{:?}", parsed.errors);
    let program = parsed.program.unwrap();
    assert_eq!(program.end_pc, 6);
    assert_eq!(program.top_level.len(), 1);
    match &program.top_level[0] {
        TopLevelStmt::Stmt(Stmt { pc: 1, kind: StmtKind::If(cond) }) => {
            assert_eq!(cond.then_branch, vec![Stmt { pc: 3, kind: StmtKind::Draw { amount: amount(1) } }]);
            assert_eq!(cond.else_branch, None);
        },
        other => panic!("expected a conditional, got {:?}", other),
    }
}

#[test]
fn terminator_inside_block() {
    let parsed = parse(&tokens(vec![
        when(EventKind::OnCast),
        draw(1),
        TokenKind::End,
    ]));
    assert_eq!(parsed.program, None);
    assert_eq!(parsed.errors, vec![
        ParseError::UnexpectedTerminator { opcode: Opcode::End, pc: 3 },
        ParseError::ExpectedButReachedEnd { expected: Opcode::EndWhen },
        ParseError::MissingTerminator,
    ]);
}

#[test]
fn unterminated_if() {
    let parsed = parse(&tokens(vec![
        if_gt_imm_stat(),
        draw(1),
        TokenKind::End,
    ]));
    assert_eq!(parsed.program, None);
    assert_eq!(parsed.errors, vec![
        ParseError::UnexpectedTerminator { opcode: Opcode::End, pc: 3 },
        ParseError::ExpectedButReachedEnd { expected: Opcode::EndIf },
        ParseError::MissingTerminator,
    ]);
}

#[test]
fn empty_branches_parse() {
    // emptiness is for the semantic checker to complain about
    let parsed = parse(&tokens(vec![
        if_gt_imm_stat(),
        TokenKind::Else,
        TokenKind::EndIf,
        when(EventKind::OnLeave),
        TokenKind::EndWhen,
        TokenKind::End,
    ]));
    assert!(parsed.is_ok(), "{:?}", parsed.errors);
    let program = parsed.program.unwrap();
    let cond = match &program.top_level[0] {
        TopLevelStmt::Stmt(stmt) => stmt.kind.as_if().unwrap(),
        other => panic!("{:?}", other),
    };
    assert!(cond.then_branch.is_empty());
    assert_eq!(cond.else_branch, Some(vec![]));
    assert!(program.top_level[1].as_when().unwrap().body.is_empty());
}

#[test]
fn no_else() {
    let parsed = parse(&tokens(vec![if_gt_imm_stat(), draw(1), TokenKind::EndIf, TokenKind::End]));
    let program = parsed.program.unwrap();
    match &program.top_level[0] {
        TopLevelStmt::Stmt(stmt) => assert_eq!(stmt.kind.as_if().unwrap().else_branch, None),
        other => panic!("{:?}", other),
    }
}

#[test]
fn missing_terminator() {
    let parsed = parse(&tokens(vec![draw(1)]));
    assert_eq!(parsed.program, None);
    assert_eq!(parsed.errors, vec![ParseError::MissingTerminator]);

    let parsed = parse(&[]);
    assert_eq!(parsed.program, None);
    assert_eq!(parsed.errors, vec![ParseError::MissingTerminator]);
}
