//! メッセージ表示コンポーネント

use yew::prelude::*;

/// メッセージ表示のプロパティ
#[derive(Properties, Clone, PartialEq)]
pub struct MessagePanelProps {
    /// 最後に受け取ったメッセージ
    pub message: Option<String>,
    /// 最後の呼び出しエラー
    pub error: Option<String>,
}

/// メッセージ表示コンポーネント
#[function_component(MessagePanel)]
pub fn message_panel(props: &MessagePanelProps) -> Html {
    html! {
        <>
            if let Some(message) = &props.message {
                <h2>{"メッセージ"}</h2>
                <div class="message">{ message.clone() }</div>
            }
            if let Some(error) = &props.error {
                <div class="error-message">{ error.clone() }</div>
            }
        </>
    }
}
