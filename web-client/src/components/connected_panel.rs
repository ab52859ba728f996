//! 接続済みパネルコンポーネント
//!
//! 自ピアID・リレーIDの表示と、対象ピアへの送信フォームを提供します。

use charcount_common::ConnectedPanel;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// 接続済みパネルのプロパティ
#[derive(Properties, Clone, PartialEq)]
pub struct ConnectedPanelProps {
    /// 表示内容
    pub panel: ConnectedPanel,
    /// 対象ピアID入力ハンドラー
    pub on_peer_id_input: Callback<String>,
    /// 対象リレーID入力ハンドラー
    pub on_relay_peer_id_input: Callback<String>,
    /// メッセージ入力ハンドラー
    pub on_message_input: Callback<String>,
    /// 送信ハンドラー
    pub on_send: Callback<()>,
    /// クリップボードコピーハンドラー
    pub on_copy: Callback<String>,
}

/// 入力値を取り出してコールバックに渡す
fn text_input(callback: &Callback<String>) -> Callback<InputEvent> {
    let callback = callback.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            callback.emit(input.value());
        }
    })
}

/// 接続済みパネルコンポーネント
#[function_component(ConnectedPanelView)]
pub fn connected_panel_view(props: &ConnectedPanelProps) -> Html {
    let panel = &props.panel;

    let copy_button = |text: &str| {
        let on_copy = props.on_copy.clone();
        let text = text.to_string();
        let onclick = Callback::from(move |_: MouseEvent| on_copy.emit(text.clone()));
        html! {
            <button class="btn-clipboard" onclick={onclick}>
                <i class="gg-clipboard"></i>
            </button>
        }
    };

    let on_send_click = {
        let on_send = props.on_send.clone();
        Callback::from(move |_: MouseEvent| on_send.emit(()))
    };

    html! {
        <>
            <h1>{"接続済み"}</h1>
            <table>
                <tbody>
                    <tr>
                        <td class="bold">{"ピアID:"}</td>
                        <td class="mono">{ panel.peer_id.clone() }</td>
                        <td>{ copy_button(&panel.peer_id) }</td>
                    </tr>
                    <tr>
                        <td class="bold">{"リレーピアID:"}</td>
                        <td class="mono">{ panel.relay_peer_id.clone() }</td>
                        <td>{ copy_button(&panel.relay_peer_id) }</td>
                    </tr>
                </tbody>
            </table>

            <div>
                <h2>{"他のピアに文字数を数えてもらう"}</h2>
                <p class="p">
                    {"同じアプリケーションを別のタブで開き、そのタブのピアIDとリレーIDを貼り付けてメッセージを送ってください。"}
                </p>
                <div class="row">
                    <label class="label bold">{"対象ピアID"}</label>
                    <input
                        class="input"
                        type="text"
                        value={panel.peer_id_input.clone()}
                        oninput={text_input(&props.on_peer_id_input)}
                    />
                </div>
                <div class="row">
                    <label class="label bold">{"対象リレー"}</label>
                    <input
                        class="input"
                        type="text"
                        value={panel.relay_peer_id_input.clone()}
                        oninput={text_input(&props.on_relay_peer_id_input)}
                    />
                </div>
                <div class="row">
                    <input
                        class="input"
                        type="text"
                        placeholder="数えてほしいメッセージ"
                        value={panel.message_to_send.clone()}
                        oninput={text_input(&props.on_message_input)}
                    />
                    <button class="btn btn-hello" onclick={on_send_click}>
                        {"メッセージを送信"}
                    </button>
                </div>
            </div>
        </>
    }
}
