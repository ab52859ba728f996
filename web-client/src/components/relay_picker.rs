//! リレー選択コンポーネント
//!
//! 未接続時に接続先リレーの一覧を表示します。

use charcount_common::RelayDescriptor;
use yew::prelude::*;

/// リレー選択のプロパティ
#[derive(Properties, Clone, PartialEq)]
pub struct RelayPickerProps {
    /// 選択可能なリレー
    pub relays: Vec<RelayDescriptor>,
    /// 接続ハンドラー（マルチアドレスを受け取る）
    pub on_connect: Callback<String>,
}

/// リレー選択コンポーネント
#[function_component(RelayPicker)]
pub fn relay_picker(props: &RelayPickerProps) -> Html {
    html! {
        <>
            <h1>{"Intro 3: ネットワーク上での計算"}</h1>
            <h2>{"リレーを選択"}</h2>
            <ul>
                { for props.relays.iter().map(|relay| {
                    let on_click = {
                        let on_connect = props.on_connect.clone();
                        let multiaddr = relay.multiaddr.clone();
                        Callback::from(move |_: MouseEvent| on_connect.emit(multiaddr.clone()))
                    };
                    html! {
                        <li key={relay.peer_id.clone()}>
                            <span class="mono">{ relay.peer_id.clone() }</span>
                            <button class="btn" onclick={on_click}>{"接続"}</button>
                        </li>
                    }
                }) }
            </ul>
        </>
    }
}
