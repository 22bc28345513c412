//! Position fingerprints.
//!
//! Every placement fact (piece type of a colour on a square, side to move,
//! castling availability, en-passant file) has a fixed 64-bit key; the
//! fingerprint is the XOR of the keys that apply. The en-passant file only
//! counts when a pawn of the side to move stands next to the pawn that
//! just double-pushed. Piece ordinals are not
//! hashed, so two positions that differ only in which rook stands where
//! still repeat.

use std::sync::OnceLock;

use crate::engine::board::Position;
use crate::engine::types::{CastlingRights, Color, PieceType, Square};

const CASTLING_KEYS: usize = 16;
const EP_KEYS: usize = 8;

/// Fixed random keys, generated once per process from a constant seed.
pub struct ZobristKeys {
    piece: [[[u64; Square::NUM]; PieceType::COUNT]; 2],
    side_to_move: u64,
    castling: [u64; CASTLING_KEYS],
    en_passant: [u64; EP_KEYS],
}

/// The process-wide key table.
pub fn keys() -> &'static ZobristKeys {
    static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
    KEYS.get_or_init(ZobristKeys::init)
}

impl ZobristKeys {
    fn init() -> Self {
        let mut rng = Xorshift64::new(0x3243_F6A8_885A_308D);

        let mut piece = [[[0u64; Square::NUM]; PieceType::COUNT]; 2];
        for per_color in &mut piece {
            for per_type in per_color {
                for key in per_type {
                    *key = rng.next_u64();
                }
            }
        }
        let side_to_move = rng.next_u64();
        let castling = std::array::from_fn(|_| rng.next_u64());
        let en_passant = std::array::from_fn(|_| rng.next_u64());

        ZobristKeys {
            piece,
            side_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub fn piece_key(&self, color: Color, piece: PieceType, sq: Square) -> u64 {
        self.piece[color.index()][piece.index()][sq.index()]
    }

    #[inline]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling[(rights.0 & 0b1111) as usize]
    }

    #[inline]
    pub fn ep_key(&self, file: u8) -> u64 {
        self.en_passant[file as usize]
    }

    #[inline]
    pub fn side_key(&self) -> u64 {
        self.side_to_move
    }
}

/// Fingerprint of a position given its current castling availability.
pub fn fingerprint(pos: &Position, castling: CastlingRights) -> u64 {
    let zk = keys();
    let mut hash = 0u64;
    for (sq, piece) in pos.board.pieces() {
        hash ^= zk.piece_key(piece.color, piece.kind, sq);
    }
    if pos.side_to_move == Color::Black {
        hash ^= zk.side_key();
    }
    hash ^= zk.castling_key(castling);
    if let Some(ep) = pos.en_passant
        && en_passant_capturable(pos, ep.pawn_square)
    {
        hash ^= zk.ep_key(ep.target.file());
    }
    hash
}

/// Whether a pawn of the side to move sits beside `pawn_square`.
fn en_passant_capturable(pos: &Position, pawn_square: Square) -> bool {
    [-1, 1].into_iter().any(|df| {
        pawn_square
            .offset(df, 0)
            .and_then(|sq| pos.board.piece_at(sq))
            .is_some_and(|p| p.is(pos.side_to_move, PieceType::Pawn))
    })
}

// ---------------------------------------------------------------------------
// Deterministic PRNG (xorshift64)
// ---------------------------------------------------------------------------

struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    fn new(seed: u64) -> Self {
        // A zero state would stay zero forever.
        Xorshift64 {
            state: seed.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
