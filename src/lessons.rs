//! Business-lesson cards, one per piece type.
//!
//! Each accepted move surfaces the card for the piece that moved. The
//! table is static data; the engine never reads it.

use serde::Serialize;

use crate::engine::types::PieceType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonCard {
    pub piece: PieceType,
    pub title: &'static str,
    pub description: &'static str,
    pub business_concept: &'static str,
    pub risk_level: Level,
    pub reward: Level,
}

/// Indexed by `PieceType::index()`.
static LESSONS: [LessonCard; 6] = [
    LessonCard {
        piece: PieceType::Pawn,
        title: "Foundation Building",
        description: "Small, consistent steps forward. Like saving $50 monthly, modest but builds discipline.",
        business_concept: "Incremental Progress",
        risk_level: Level::Low,
        reward: Level::Low,
    },
    LessonCard {
        piece: PieceType::Knight,
        title: "Creative Problem Solving",
        description: "Think outside the box. Sometimes unconventional approaches yield the best results.",
        business_concept: "Innovation Strategy",
        risk_level: Level::Medium,
        reward: Level::High,
    },
    LessonCard {
        piece: PieceType::Bishop,
        title: "Long-term Vision",
        description: "Focus on diagonal growth: specialization in your chosen field over time.",
        business_concept: "Strategic Focus",
        risk_level: Level::Low,
        reward: Level::Medium,
    },
    LessonCard {
        piece: PieceType::Rook,
        title: "Direct Action",
        description: "Straight-line power moves. Bold decisions that cut through complexity.",
        business_concept: "Decisive Leadership",
        risk_level: Level::Medium,
        reward: Level::High,
    },
    LessonCard {
        piece: PieceType::Queen,
        title: "Maximum Leverage",
        description: "Your most valuable asset. Use it wisely; it represents your peak skill or network.",
        business_concept: "Core Competency",
        risk_level: Level::High,
        reward: Level::High,
    },
    LessonCard {
        piece: PieceType::King,
        title: "Personal Security",
        description: "Protect your foundation: emergency fund, health, core relationships.",
        business_concept: "Risk Management",
        risk_level: Level::Low,
        reward: Level::Medium,
    },
];

/// The lesson shown after moving a piece of this kind.
pub fn lesson_for(kind: PieceType) -> &'static LessonCard {
    &LESSONS[kind.index()]
}

/// The whole table, pawn to king.
pub fn lessons() -> &'static [LessonCard] {
    &LESSONS
}
