use cosmwasm_std::{Addr, Timestamp};
use cw_storage_plus::{Index, IndexList, IndexedMap, Item, Map, MultiIndex};
use streampay_types::ledger::Params;
use streampay_types::stream::{DenomTotals, Stream};

pub const PARAMS: Item<Params> = Item::new("params");
pub const FREEZESTATE: Item<bool> = Item::new("freezestate");
pub const LAST_STREAM_ID: Item<u64> = Item::new("last_stream_id");

// Closed stream ids, only tracked when reuse is forbidden. stream_id -> closed at
pub const RETIRED_STREAM_IDS: Map<u64, Timestamp> = Map::new("retired_stream_ids");

// denom -> running totals
pub const TOTALS: Map<&str, DenomTotals> = Map::new("totals");

pub struct StreamIndexes<'a> {
    pub sender: MultiIndex<'a, Addr, Stream, u64>,
    pub recipient: MultiIndex<'a, Addr, Stream, u64>,
}

impl<'a> IndexList<Stream> for StreamIndexes<'a> {
    fn get_indexes(&'_ self) -> Box<dyn Iterator<Item = &'_ dyn Index<Stream>> + '_> {
        let v: Vec<&dyn Index<Stream>> = vec![&self.sender, &self.recipient];
        Box::new(v.into_iter())
    }
}

// Live streams only. stream_id -> Stream
pub fn streams<'a>() -> IndexedMap<'a, u64, Stream, StreamIndexes<'a>> {
    let indexes = StreamIndexes {
        sender: MultiIndex::new(|_pk, s| s.sender.clone(), "streams", "streams__sender"),
        recipient: MultiIndex::new(
            |_pk, s| s.recipient.clone(),
            "streams",
            "streams__recipient",
        ),
    };
    IndexedMap::new("streams", indexes)
}
