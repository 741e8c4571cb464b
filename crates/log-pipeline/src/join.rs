//! 해시 조인 -- 두 레코드 시퀀스를 `hash` 필드로 연결합니다.
//!
//! 인덱스 없이 중첩 선형 스캔(O(n*m))을 합니다. 입력 크기는 tail 윈도우로
//! 제한되므로 충분합니다.

use blockcmp_core::types::{HASH_FIELD, Record};

/// `hash` 필드가 같은 레코드 쌍을 병합합니다.
///
/// 매칭마다 왼쪽 레코드의 복사본에 오른쪽 레코드의 필드를 덮어써서 내보냅니다.
/// 출력 순서는 왼쪽 순서, 그 안에서 오른쪽 순서를 따릅니다.
/// 어느 쪽이든 `hash` 필드가 없는 레코드는 매칭되지 않습니다.
pub fn join_by_hash<'a>(
    left: &'a [Record],
    right: &'a [Record],
) -> impl Iterator<Item = Record> + 'a {
    join_on(left, right, HASH_FIELD)
}

/// 임의의 텍스트 필드로 조인합니다.
pub fn join_on<'a>(
    left: &'a [Record],
    right: &'a [Record],
    key: &'a str,
) -> impl Iterator<Item = Record> + 'a {
    left.iter()
        .filter_map(move |l| l.get_text(key).map(|k| (l, k)))
        .flat_map(move |(l, k)| {
            right
                .iter()
                .filter(move |r| r.get_text(key) == Some(k))
                .map(move |r| {
                    let mut merged = l.clone();
                    merged.merge_from(r);
                    merged
                })
        })
}
