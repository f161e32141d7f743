// Core Domain
// メタデータ、比較結果、差分辞書、設定などの純粋なデータ型

pub mod comparison;
pub mod config;
pub mod difference;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod naming;
pub mod profiles;
