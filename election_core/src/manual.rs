/*!

This is the long-form manual for `election_core` and `evote`.

## The election

An election has one national race and one race per province. Each race elects an
assembly with a fixed number of seats: 200 for the national assembly, 300 for each
provincial assembly unless configured otherwise.

Candidates belong to a party and to exactly one race. Their ids are only unique
within their race: the first candidate of a race gets id `1`, the next one the largest
id of the race plus one. Removing the last candidate of a race and adding a new one
hands out id `1` again.

## Voting

One voter is registered at a time, with a name, an id number, an age (at least 18) and
a province. The voter has two ballots:

- a national ballot, for any national candidate,
- a provincial ballot, only in the race of the province given at registration.

Each ballot can be used once. Ending the session (logout, or the administrator reset)
forgets the voter and makes both ballots available to the next voter. Vote counts are
kept.

A refused ballot does not change anything. The errors are:

| error             | when                                                           |
|-------------------|----------------------------------------------------------------|
| `NoActiveSession` | nobody is registered                                           |
| `NotFound`        | the race or the candidate does not exist                       |
| `Validation`      | provincial ballot in another province, bad registration, ...   |
| `AlreadyVoted`    | the ballot for this race was already used in this session      |

## Results

For every race, the tabulation gives for each party the sum of the votes of its
candidates, the share of the votes of the race and the projected seats, and the list of
all the candidates, most votes first. Candidates with the same number of votes keep the
order in which they were registered.

Two seat rules are available:

- `roundedShare` (default): `round(share × seats)`, halves rounded up. Every party is
  rounded on its own, so the projected seats do not always add up to the assembly:
  three parties with the same number of votes get 67 of 200 seats each.
- `largestRemainder`: every party first gets the integer part of `share × seats`; the
  seats left go to the largest fractional parts, the earlier party in the list winning
  ties. The seats always add up to the assembly once a vote is cast.

A race without votes is not an error: every share and seat count is zero.

In the `evote` output, every party comes with its name, display color, votes, share and
seats, and every ranked candidate with its votes and its share of the race.

## `evote`

`evote` replays a voting session described in a JSON file and prints the results.

```bash
evote --config election.json --out results.json --top 5
```

Without `--config`, the standard election (parties PTI and PDM, provinces Punjab, Sindh,
Balochistan and KPK) is tabulated. It is seeded with demo candidates: Imran Khan,
General Asim Muneer, Shah Mehmood Qureshi and Nawaz Shareef in the national race, and
Murad Saeed, Rana Snaullah, Omar Sarfraz and Maryam nawaz in every province, with ids
1 to 4. With `--reference`, the output is
compared to a previous summary and the differences are printed.

### Election file

```text
{
  "outputSettings": { "contestName": "General election", "topCandidates": 10 },
  "parties": [ { "code": "PTI", "name": "PTI", "color": "#ff4d4d" } ],
  "nationalSeats": 200,
  "provinces": [ { "name": "Sindh", "seats": 168 } ],
  "candidates": [ { "race": "national", "name": "Anna", "party": "PTI" } ],
  "candidateFiles": [ { "race": "Sindh", "filePath": "sindh.csv" } ],
  "rules": { "seatAllocation": "largestRemainder" },
  "actions": [
    { "action": "register", "name": "Ayesha", "idNumber": "42101", "age": 30, "province": "Sindh" },
    { "action": "vote", "race": "national", "candidate": 1 },
    { "action": "endSession" }
  ]
}
```

`parties` and `provinces` default to the standard election. A file that lists no
candidate and keeps the standard parties also gets the demo candidates, in every
province it declares. The races are named
`national` or by the province name. The CSV candidate files have a `name,party` header
and are found relative to the election file.

The actions are `register`, `vote`, `endSession`, `addCandidate` (`race`, `name`,
`party`) and `removeCandidate` (`race`, `candidate`). A refused action is reported in the
`rejected` section of the output and the replay goes on.

 */
