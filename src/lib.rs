//! 家具写真の類似アイテム検索ワークフロー
//!
//! 画像の検証・プレビュー生成・マッチングサービスへの送信・応答の正規化を
//! 一つの状態機械（`workflow::WorkflowController`）にまとめる。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod loader;
pub mod workflow;
