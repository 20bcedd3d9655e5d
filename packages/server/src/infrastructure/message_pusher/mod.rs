//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//! インスタンス間の配送は EventBus が担い、ここではローカルに接続している
//! クライアントへの fan-out のみを扱います。
//!
//! ## 実装
//!
//! - `websocket`: WebSocket を使った実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
