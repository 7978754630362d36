//! Spec §8 testable property: `decode(encode(decode(d))) == decode(d)` for
//! `AgentState`, exercised through both the JSON and MsgPack codec paths.

use genx::agent::{AgentState, Message};
use genx::{from_json, from_msgpack, to_json, to_msgpack};

fn sample_react_state() -> AgentState {
    let mut state = AgentState::new_react("s1", "weather-agent");
    if let AgentState::React { common, .. } = &mut state {
        common.messages.push(Message::user("hi", 0));
        common.messages.push(Message::model_tool_call("c1", "get_weather", "{}", 1));
        common.messages.push(Message::tool_result("c1", "sunny", 2));
        common.messages.push(Message::model_text("it is sunny", 3));
    }
    state
}

#[test]
fn json_round_trip_is_idempotent_after_the_first_decode() {
    let original = sample_react_state();
    let once = AgentState::from_json(&to_json(&original).unwrap()).unwrap();
    let twice = AgentState::from_json(&to_json(&once).unwrap()).unwrap();
    assert_eq!(to_json(&once).unwrap(), to_json(&twice).unwrap());
}

#[test]
fn msgpack_round_trip_is_idempotent_after_the_first_decode() {
    let original = sample_react_state();
    let once = AgentState::from_msgpack(&original.to_msgpack().unwrap()).unwrap();
    let twice = AgentState::from_msgpack(&once.to_msgpack().unwrap()).unwrap();
    assert_eq!(once.to_msgpack().unwrap(), twice.to_msgpack().unwrap());
}

#[test]
fn json_and_msgpack_agree_on_the_decoded_value() {
    let original = sample_react_state();
    let via_json = AgentState::from_json(&to_json(&original).unwrap()).unwrap();
    let via_msgpack = AgentState::from_msgpack(&original.to_msgpack().unwrap()).unwrap();
    assert_eq!(to_json(&via_json).unwrap(), to_json(&via_msgpack).unwrap());
}

#[test]
fn a_plain_message_round_trips_through_both_codecs() {
    let msg = Message::model_tool_call("call-1", "search", "{\"q\":\"rust\"}", 42);
    let json_back: Message = from_json(&to_json(&msg).unwrap()).unwrap();
    assert_eq!(json_back, msg);

    let bytes = to_msgpack(&msg).unwrap();
    let msgpack_back: Message = from_msgpack(&bytes).unwrap();
    assert_eq!(msgpack_back, msg);
}
