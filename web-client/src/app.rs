//! Webクライアントアプリケーション
//!
//! Yewを使用したWebクライアントのメインアプリケーションを実装します。
//! 状態は共通ライブラリの `Session` が保持し、変更通知で再描画します。

use std::rc::Rc;

use charcount_common::{Screen, Session};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::{ConnectedPanelView, MessagePanel, RelayPicker};
use crate::config;
use crate::utils::{copy_to_clipboard, WebSocketClientFactory};

/// メインアプリケーション
#[function_component(App)]
pub fn app() -> Html {
    let force_update = use_force_update();

    // セッションは最初の描画で一度だけ作成する
    let session = use_memo(
        move |_| Session::new(config::load()).with_listener(Rc::new(move || force_update.force_update())),
        (),
    );

    // 接続ハンドラー
    let on_connect = {
        let session = session.clone();
        Callback::from(move |multiaddr: String| {
            let session = session.clone();
            spawn_local(async move {
                // 失敗はセッション側でログに記録され、画面は未接続のまま
                let _ = session.connect(&WebSocketClientFactory, &multiaddr).await;
            });
        })
    };

    // 送信ハンドラー
    let on_send = {
        let session = session.clone();
        Callback::from(move |_| {
            let session = session.clone();
            spawn_local(async move {
                let outcome = session.send_message().await;
                log::debug!("送信結果: {:?}", outcome);
            });
        })
    };

    let on_peer_id_input = {
        let session = session.clone();
        Callback::from(move |text: String| session.set_peer_id_input(text))
    };

    let on_relay_peer_id_input = {
        let session = session.clone();
        Callback::from(move |text: String| session.set_relay_peer_id_input(text))
    };

    let on_message_input = {
        let session = session.clone();
        Callback::from(move |text: String| session.set_message_to_send(text))
    };

    // クリップボードコピーハンドラー
    let on_copy = Callback::from(|text: String| {
        spawn_local(async move {
            match copy_to_clipboard(&text).await {
                Ok(()) => log::debug!("クリップボードにコピーしました: {}", text),
                Err(e) => log::warn!("{}", e),
            }
        });
    });

    let view = session.view();

    html! {
        <div class="App">
            <header>
                <img src="logo.svg" class="logo" alt="logo" />
            </header>

            <div class="content">
                {
                    match view.screen {
                        Screen::RelayPicker { relays } => html! {
                            <RelayPicker relays={relays} on_connect={on_connect} />
                        },
                        Screen::Connected(panel) => html! {
                            <ConnectedPanelView
                                panel={panel}
                                on_peer_id_input={on_peer_id_input}
                                on_relay_peer_id_input={on_relay_peer_id_input}
                                on_message_input={on_message_input}
                                on_send={on_send}
                                on_copy={on_copy}
                            />
                        },
                    }
                }

                <MessagePanel message={view.message} error={view.error} />
            </div>
        </div>
    }
}
